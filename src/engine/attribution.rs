//! engine::attribution
//!
//! Work out which commits of a branch update are new to the repository.
//!
//! # Algorithm
//!
//! The detailed set is everything reachable from the new tip that no other
//! branch already reached before this push:
//!
//! - this branch: exclude its old tip (nothing on creation)
//! - a branch updated in this batch but not yet emitted: exclude its old
//!   tip, because its new commits will be described when it is processed
//! - any other branch: exclude its current tip
//!
//! `added` and `removed` are the plain old..new and new..old ranges. A
//! creation has no meaningful old side, so its listing starts just below
//! the oldest detailed commit instead of walking the whole history. When
//! that commit has no parent (the first push to a repository) the listing
//! is everything reachable from the new tip, not empty: a missing parent
//! would otherwise leave the cover of a first push with no commits.

use std::collections::HashSet;

use super::batch::BatchContext;
use super::change::Change;
use super::cover;
use crate::core::types::Oid;
use crate::git::{CommitInfo, GitError, RepoQuery};

/// Commits added and removed by a branch change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributionResult {
    /// Commits reachable from new but not old, oldest first
    pub added: Vec<CommitInfo>,
    /// Commits reachable from old but not new, oldest first
    pub removed: Vec<CommitInfo>,
    /// Added commits that get their own message
    pub detailed: HashSet<Oid>,
    pub needs_cover: bool,
}

impl AttributionResult {
    pub fn is_detailed(&self, oid: &Oid) -> bool {
        self.detailed.contains(oid)
    }

    /// Added commits that get a message, with their 1-based position in
    /// `added`.
    pub fn detailed_commits(&self) -> impl Iterator<Item = (usize, &CommitInfo)> {
        self.added
            .iter()
            .enumerate()
            .filter(|(_, c)| self.detailed.contains(&c.oid))
            .map(|(i, c)| (i + 1, c))
    }
}

/// Attribute the commits of a branch creation or update.
///
/// A change without a new tip has nothing to attribute and yields an empty
/// result.
pub fn attribute(
    repo: &dyn RepoQuery,
    change: &Change,
    batch: &BatchContext,
) -> Result<AttributionResult, GitError> {
    let Some(new) = &change.new else {
        return Ok(AttributionResult::default());
    };

    let mut exclude = Vec::new();
    for (branch, tip) in repo.branch_refs()? {
        if branch == change.refname {
            exclude.extend(change.old.iter().cloned());
        } else if let Some(sibling) = batch.pending(&branch) {
            exclude.extend(sibling.old.iter().cloned());
        } else {
            exclude.push(tip);
        }
    }

    let detailed_list = repo.rev_list(new, &exclude)?;
    let detailed: HashSet<Oid> = detailed_list.iter().cloned().collect();

    let (mut added_ids, mut removed_ids) = match &change.old {
        None => {
            let added = match detailed_list.last() {
                Some(oldest) => match repo.first_parent(oldest)? {
                    Some(parent) => repo.rev_list(new, &[parent])?,
                    // root commit: list the whole history rather than nothing
                    None => repo.rev_list(new, &[])?,
                },
                None => Vec::new(),
            };
            (added, Vec::new())
        }
        Some(old) => (
            repo.rev_list(new, std::slice::from_ref(old))?,
            repo.rev_list(old, std::slice::from_ref(new))?,
        ),
    };
    added_ids.reverse();
    removed_ids.reverse();

    let added = repo.commit_infos(&added_ids)?;
    let removed = repo.commit_infos(&removed_ids)?;
    let needs_cover = cover::cover_required(change.is_creation(), &added, &removed, &detailed);

    tracing::debug!(
        refname = %change.refname,
        added = added.len(),
        removed = removed.len(),
        detailed = detailed.len(),
        needs_cover,
        "attributed commits"
    );

    Ok(AttributionResult {
        added,
        removed,
        detailed,
        needs_cover,
    })
}
