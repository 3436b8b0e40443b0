//! git::mock
//!
//! In-memory repository for deterministic testing.
//!
//! # Design
//!
//! `MockRepo` implements [`RepoQuery`] over a hand-built commit graph. Object
//! ids are generated from a counter and commit times increase with creation
//! order, so `rev_list` ordering is predictable.
//!
//! # Example
//!
//! ```
//! use refmail::git::mock::MockRepo;
//! use refmail::git::RepoQuery;
//!
//! let mut repo = MockRepo::new();
//! let c1 = repo.commit("Initial import", &[]);
//! let c2 = repo.commit("Fix the build", &[&c1]);
//! repo.set_branch("refs/heads/master", &c2);
//!
//! assert_eq!(repo.rev_list(&c2, &[c1.clone()]).unwrap(), vec![c2.clone()]);
//! assert_eq!(repo.first_parent(&c1).unwrap(), None);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration};

use super::interface::{CommitDiff, CommitInfo, GitError, ObjectKind};
use super::query::RepoQuery;
use crate::core::types::{Oid, RefName};

#[derive(Debug, Clone)]
enum MockObject {
    Commit(CommitInfo),
    Tag { target: Oid, payload: String },
    Blob,
}

/// Mock repository for testing.
#[derive(Debug, Default, Clone)]
pub struct MockRepo {
    objects: HashMap<Oid, MockObject>,
    refs: BTreeMap<RefName, Oid>,
    next_id: u64,
}

impl MockRepo {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> Oid {
        self.next_id += 1;
        Oid::new(format!("{:040x}", self.next_id)).expect("counter formats as 40 hex digits")
    }

    /// Add a commit with the given subject and parents.
    pub fn commit(&mut self, subject: &str, parents: &[&Oid]) -> Oid {
        let oid = self.allocate();
        let author_time = (DateTime::UNIX_EPOCH + Duration::seconds(self.next_id as i64 * 60))
            .fixed_offset();
        let info = CommitInfo {
            oid: oid.clone(),
            summary: subject.to_string(),
            message: format!("{subject}\n"),
            author_name: "Test User".to_string(),
            author_email: "test@example.com".to_string(),
            author_time,
            parents: parents.iter().map(|p| (*p).clone()).collect(),
        };
        self.objects.insert(oid.clone(), MockObject::Commit(info));
        oid
    }

    /// Add an annotated tag object pointing at `target`.
    ///
    /// The tag ref itself is not created; use [`MockRepo::set_ref`].
    pub fn tag_object(&mut self, target: &Oid, payload: &str) -> Oid {
        let oid = self.allocate();
        self.objects.insert(
            oid.clone(),
            MockObject::Tag {
                target: target.clone(),
                payload: payload.to_string(),
            },
        );
        oid
    }

    /// Add a blob object.
    pub fn blob(&mut self) -> Oid {
        let oid = self.allocate();
        self.objects.insert(oid.clone(), MockObject::Blob);
        oid
    }

    /// Point a branch at a commit, creating it if needed.
    pub fn set_branch(&mut self, refname: &str, oid: &Oid) {
        self.set_ref(refname, oid);
    }

    /// Point any ref at an object.
    pub fn set_ref(&mut self, refname: &str, oid: &Oid) {
        let name = RefName::new(refname).expect("test ref names are valid");
        self.refs.insert(name, oid.clone());
    }

    /// Delete a ref.
    pub fn remove_ref(&mut self, refname: &str) {
        self.refs.retain(|name, _| name.as_str() != refname);
    }

    fn commit_ref(&self, oid: &Oid) -> Result<&CommitInfo, GitError> {
        match self.objects.get(oid) {
            Some(MockObject::Commit(info)) => Ok(info),
            Some(_) => Err(GitError::WrongObjectKind {
                oid: oid.to_string(),
                expected: "commit",
            }),
            None => Err(GitError::ObjectNotFound {
                oid: oid.to_string(),
            }),
        }
    }

    fn reachable(&self, start: &Oid) -> Result<HashSet<Oid>, GitError> {
        let mut seen = HashSet::new();
        let mut stack = vec![self.peel_to_commit(start)?];
        while let Some(oid) = stack.pop() {
            if !seen.insert(oid.clone()) {
                continue;
            }
            stack.extend(self.commit_ref(&oid)?.parents.iter().cloned());
        }
        Ok(seen)
    }

    fn newest_first(&self, mut oids: Vec<Oid>) -> Result<Vec<Oid>, GitError> {
        let mut keyed = Vec::with_capacity(oids.len());
        for oid in oids.drain(..) {
            let time = self.commit_ref(&oid)?.author_time;
            keyed.push((time, oid));
        }
        keyed.sort_by(|a, b| b.cmp(a));
        Ok(keyed.into_iter().map(|(_, oid)| oid).collect())
    }
}

impl RepoQuery for MockRepo {
    fn resolve_rev(&self, rev: &str) -> Result<Option<Oid>, GitError> {
        if Oid::is_null_rev(rev) {
            return Ok(None);
        }
        if let Some((_, oid)) = self.refs.iter().find(|(name, _)| name.as_str() == rev) {
            return Ok(Some(oid.clone()));
        }
        match Oid::new(rev) {
            Ok(oid) if self.objects.contains_key(&oid) => Ok(Some(oid)),
            _ => Err(GitError::RevNotFound {
                rev: rev.to_string(),
            }),
        }
    }

    fn object_kind(&self, oid: &Oid) -> Result<ObjectKind, GitError> {
        match self.objects.get(oid) {
            Some(MockObject::Commit(_)) => Ok(ObjectKind::Commit),
            Some(MockObject::Tag { .. }) => Ok(ObjectKind::Tag),
            Some(MockObject::Blob) => Ok(ObjectKind::Blob),
            None => Err(GitError::ObjectNotFound {
                oid: oid.to_string(),
            }),
        }
    }

    fn peel_to_commit(&self, oid: &Oid) -> Result<Oid, GitError> {
        match self.objects.get(oid) {
            Some(MockObject::Commit(_)) => Ok(oid.clone()),
            Some(MockObject::Tag { target, .. }) => self.peel_to_commit(target),
            Some(MockObject::Blob) => Err(GitError::WrongObjectKind {
                oid: oid.to_string(),
                expected: "commit",
            }),
            None => Err(GitError::ObjectNotFound {
                oid: oid.to_string(),
            }),
        }
    }

    fn branch_refs(&self) -> Result<Vec<(RefName, Oid)>, GitError> {
        Ok(self
            .refs
            .iter()
            .filter(|(name, _)| name.is_branch_ref())
            .map(|(name, oid)| (name.clone(), oid.clone()))
            .collect())
    }

    fn rev_list(&self, include: &Oid, exclude: &[Oid]) -> Result<Vec<Oid>, GitError> {
        let mut hidden = HashSet::new();
        for oid in exclude {
            hidden.extend(self.reachable(oid)?);
        }
        let listed = self
            .reachable(include)?
            .into_iter()
            .filter(|oid| !hidden.contains(oid))
            .collect();
        self.newest_first(listed)
    }

    fn first_parent(&self, oid: &Oid) -> Result<Option<Oid>, GitError> {
        Ok(self.commit_ref(oid)?.parents.first().cloned())
    }

    fn commit_info(&self, oid: &Oid) -> Result<CommitInfo, GitError> {
        self.commit_ref(oid).cloned()
    }

    fn tag_payload(&self, oid: &Oid) -> Result<String, GitError> {
        match self.objects.get(oid) {
            Some(MockObject::Tag { payload, .. }) => Ok(payload.clone()),
            Some(_) => Err(GitError::WrongObjectKind {
                oid: oid.to_string(),
                expected: "tag",
            }),
            None => Err(GitError::ObjectNotFound {
                oid: oid.to_string(),
            }),
        }
    }

    fn previous_tag(&self, oid: &Oid) -> Result<Option<(String, Oid)>, GitError> {
        let commit = self.peel_to_commit(oid)?;
        let parent = match self.first_parent(&commit)? {
            Some(p) => p,
            None => return Ok(None),
        };

        let candidates = self.newest_first(self.reachable(&parent)?.into_iter().collect())?;
        for candidate in candidates {
            for (name, target) in &self.refs {
                let Some(MockObject::Tag { target: tagged, .. }) = self.objects.get(target) else {
                    continue;
                };
                if *tagged == candidate {
                    if let Some(short) = name.as_str().strip_prefix("refs/tags/") {
                        return Ok(Some((short.to_string(), candidate)));
                    }
                }
            }
        }
        Ok(None)
    }

    fn commit_diff(&self, oid: &Oid) -> Result<CommitDiff, GitError> {
        let info = self.commit_ref(oid)?;
        Ok(CommitDiff {
            stat: " NEWS | 1 +\n 1 file changed, 1 insertion(+)\n".to_string(),
            patch: format!(
                "diff --git a/NEWS b/NEWS\n--- a/NEWS\n+++ b/NEWS\n@@ -0,0 +1 @@\n+{}\n",
                info.summary
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rev_list_excludes_ancestors_of_hidden() {
        let mut repo = MockRepo::new();
        let c1 = repo.commit("one", &[]);
        let c2 = repo.commit("two", &[&c1]);
        let c3 = repo.commit("three", &[&c2]);

        assert_eq!(
            repo.rev_list(&c3, &[]).unwrap(),
            vec![c3.clone(), c2.clone(), c1.clone()]
        );
        assert_eq!(repo.rev_list(&c3, &[c1]).unwrap(), vec![c3, c2]);
    }

    #[test]
    fn rev_list_through_merges() {
        let mut repo = MockRepo::new();
        let base = repo.commit("base", &[]);
        let left = repo.commit("left", &[&base]);
        let right = repo.commit("right", &[&base]);
        let merge = repo.commit("merge", &[&left, &right]);

        let listed = repo.rev_list(&merge, &[left.clone()]).unwrap();
        assert_eq!(listed, vec![merge, right]);
    }

    #[test]
    fn resolve_null_and_refs() {
        let mut repo = MockRepo::new();
        let c1 = repo.commit("one", &[]);
        repo.set_branch("refs/heads/master", &c1);

        assert_eq!(repo.resolve_rev(Oid::NULL).unwrap(), None);
        assert_eq!(repo.resolve_rev("refs/heads/master").unwrap(), Some(c1.clone()));
        assert_eq!(repo.resolve_rev(c1.as_str()).unwrap(), Some(c1));
        assert!(repo.resolve_rev("refs/heads/missing").is_err());
    }

    #[test]
    fn previous_tag_skips_the_tagged_commit() {
        let mut repo = MockRepo::new();
        let c1 = repo.commit("one", &[]);
        let c2 = repo.commit("two", &[&c1]);
        let t1 = repo.tag_object(&c1, "object x\n");
        repo.set_ref("refs/tags/v1", &t1);
        let t2 = repo.tag_object(&c2, "object y\n");
        repo.set_ref("refs/tags/v2", &t2);

        assert_eq!(
            repo.previous_tag(&t2).unwrap(),
            Some(("v1".to_string(), c1.clone()))
        );
        assert_eq!(repo.previous_tag(&t1).unwrap(), None);
    }

    #[test]
    fn object_kinds() {
        let mut repo = MockRepo::new();
        let c1 = repo.commit("one", &[]);
        let tag = repo.tag_object(&c1, "");
        let blob = repo.blob();
        assert_eq!(repo.object_kind(&c1).unwrap(), ObjectKind::Commit);
        assert_eq!(repo.object_kind(&tag).unwrap(), ObjectKind::Tag);
        assert_eq!(repo.object_kind(&blob).unwrap(), ObjectKind::Blob);
        assert_eq!(repo.peel_to_commit(&tag).unwrap(), c1);
    }
}
