//! git::query
//!
//! The repository queries the notification engine depends on.
//!
//! # Design
//!
//! The engine and renderer take `&dyn RepoQuery` rather than [`Git`] so that
//! attribution and rendering can run against [`super::mock::MockRepo`] in
//! tests. [`Git`] is the only production implementation.

use super::interface::{CommitDiff, CommitInfo, Git, GitError, ObjectKind};
use crate::core::types::{Oid, RefName};

/// Read-only repository queries used while building notifications.
pub trait RepoQuery {
    /// Canonicalize a revision; the all-zero sentinel resolves to `None`.
    fn resolve_rev(&self, rev: &str) -> Result<Option<Oid>, GitError>;

    /// Kind of the object `oid` names.
    fn object_kind(&self, oid: &Oid) -> Result<ObjectKind, GitError>;

    /// Peel a tag or commit to a commit id.
    fn peel_to_commit(&self, oid: &Oid) -> Result<Oid, GitError>;

    /// Every branch ref with its current tip, sorted by name.
    fn branch_refs(&self) -> Result<Vec<(RefName, Oid)>, GitError>;

    /// Commits reachable from `include` and from none of `exclude`, newest first.
    fn rev_list(&self, include: &Oid, exclude: &[Oid]) -> Result<Vec<Oid>, GitError>;

    /// First parent of a commit; `None` for a root commit.
    fn first_parent(&self, oid: &Oid) -> Result<Option<Oid>, GitError>;

    /// Commit metadata.
    fn commit_info(&self, oid: &Oid) -> Result<CommitInfo, GitError>;

    /// Raw payload of an annotated tag object.
    fn tag_payload(&self, oid: &Oid) -> Result<String, GitError>;

    /// Nearest earlier annotated tag (name and tagged commit).
    fn previous_tag(&self, oid: &Oid) -> Result<Option<(String, Oid)>, GitError>;

    /// Stat and filtered patch of a commit.
    fn commit_diff(&self, oid: &Oid) -> Result<CommitDiff, GitError>;

    /// Metadata for each id in `oids`, preserving order.
    fn commit_infos(&self, oids: &[Oid]) -> Result<Vec<CommitInfo>, GitError> {
        oids.iter().map(|oid| self.commit_info(oid)).collect()
    }
}

impl RepoQuery for Git {
    fn resolve_rev(&self, rev: &str) -> Result<Option<Oid>, GitError> {
        Git::resolve_rev(self, rev)
    }

    fn object_kind(&self, oid: &Oid) -> Result<ObjectKind, GitError> {
        Git::object_kind(self, oid)
    }

    fn peel_to_commit(&self, oid: &Oid) -> Result<Oid, GitError> {
        Git::peel_to_commit(self, oid)
    }

    fn branch_refs(&self) -> Result<Vec<(RefName, Oid)>, GitError> {
        Git::branch_refs(self)
    }

    fn rev_list(&self, include: &Oid, exclude: &[Oid]) -> Result<Vec<Oid>, GitError> {
        Git::rev_list(self, include, exclude)
    }

    fn first_parent(&self, oid: &Oid) -> Result<Option<Oid>, GitError> {
        Git::first_parent(self, oid)
    }

    fn commit_info(&self, oid: &Oid) -> Result<CommitInfo, GitError> {
        Git::commit_info(self, oid)
    }

    fn tag_payload(&self, oid: &Oid) -> Result<String, GitError> {
        Git::tag_payload(self, oid)
    }

    fn previous_tag(&self, oid: &Oid) -> Result<Option<(String, Oid)>, GitError> {
        Git::previous_tag(self, oid)
    }

    fn commit_diff(&self, oid: &Oid) -> Result<CommitDiff, GitError> {
        Git::commit_diff(self, oid)
    }
}
