//! engine::cover
//!
//! When a change gets a summary ("cover") message.

use std::collections::HashSet;

use super::attribution::AttributionResult;
use super::change::Change;
use crate::core::types::Oid;
use crate::git::CommitInfo;

/// Whether a branch create/update needs a cover message on top of its
/// per-commit messages.
///
/// A cover is needed for a creation, a non-fast-forward update, any merge
/// among the added commits, or when some added commit gets no message of
/// its own.
pub fn cover_required(
    is_creation: bool,
    added: &[CommitInfo],
    removed: &[CommitInfo],
    detailed: &HashSet<Oid>,
) -> bool {
    is_creation
        || !removed.is_empty()
        || added.iter().any(CommitInfo::is_merge)
        || detailed.len() < added.len()
}

/// Whether `change` gets a main message.
///
/// Branch creations and updates follow their attribution; every other kind
/// always gets exactly one.
pub fn needs_main_notification(change: &Change, attribution: Option<&AttributionResult>) -> bool {
    if !change.kind.has_commits() {
        return true;
    }
    attribution.map(|a| a.needs_cover).unwrap_or(true)
}
