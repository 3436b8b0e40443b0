//! engine::prepare
//!
//! Repository work done for a change just before its messages are rendered.
//!
//! Preparation runs lazily, one change at a time, because branch
//! attribution depends on which changes of the batch have already been
//! emitted.

use super::attribution::{self, AttributionResult};
use super::batch::BatchContext;
use super::change::Change;
use super::tag::{parse_tag_payload, TagInfo};
use crate::core::types::Oid;
use crate::git::{CommitInfo, GitError, RepoQuery};

/// What an annotated tag change needs for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDetails {
    pub info: TagInfo,
    /// Commit the old tag pointed at
    pub old_commit: Option<Oid>,
    /// Nearest earlier tag reachable from the tagged commit's first parent
    pub previous_tag: Option<String>,
    /// Commits since `previous_tag` (or the whole history), oldest first;
    /// empty for deletions
    pub shortlog: Vec<CommitInfo>,
}

/// Data gathered for one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    Branch(AttributionResult),
    AnnotatedTag(TagDetails),
    /// Nothing beyond the change itself
    Plain,
}

impl Prepared {
    pub fn attribution(&self) -> Option<&AttributionResult> {
        match self {
            Prepared::Branch(result) => Some(result),
            _ => None,
        }
    }
}

/// Gather what `change` needs before it can be rendered.
pub fn prepare(
    repo: &dyn RepoQuery,
    change: &Change,
    batch: &BatchContext,
) -> Result<Prepared, GitError> {
    if change.kind.has_commits() {
        return Ok(Prepared::Branch(attribution::attribute(repo, change, batch)?));
    }
    if change.kind.is_annotated_tag() {
        return Ok(Prepared::AnnotatedTag(prepare_tag(repo, change)?));
    }
    Ok(Prepared::Plain)
}

fn prepare_tag(repo: &dyn RepoQuery, change: &Change) -> Result<TagDetails, GitError> {
    let old_commit = change
        .old
        .as_ref()
        .map(|old| repo.peel_to_commit(old))
        .transpose()?;

    let tag_object = change
        .new
        .as_ref()
        .or(change.old.as_ref())
        .ok_or_else(|| GitError::Internal {
            message: format!("{} has no tag object", change.refname),
        })?;
    let info = parse_tag_payload(&repo.tag_payload(tag_object)?);

    let (previous_tag, shortlog) = match &change.new {
        Some(new) => {
            let tagged = repo.peel_to_commit(new)?;
            let previous = repo.previous_tag(new)?;
            let exclude: Vec<Oid> = previous.iter().map(|(_, commit)| commit.clone()).collect();
            let mut ids = repo.rev_list(&tagged, &exclude)?;
            ids.reverse();
            (previous.map(|(name, _)| name), repo.commit_infos(&ids)?)
        }
        None => (None, Vec::new()),
    };

    Ok(TagDetails {
        info,
        old_commit,
        previous_tag,
        shortlog,
    })
}
