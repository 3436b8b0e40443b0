//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads flow
//! through this interface. No other module should import `git2`.
//!
//! The notification engine never writes to the repository: by the time the
//! hook runs, the push has already been accepted.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening (bare repositories included)
//! - Revision resolution and object kind lookup
//! - Branch enumeration
//! - Ancestry queries (rev-list with exclusions, first parent, describe)
//! - Commit metadata, tag payloads, and per-commit diffs
//!
//! # Seams
//!
//! [`RepoQuery`] is the trait the engine consumes. [`Git`] implements it with
//! libgit2; [`mock::MockRepo`] implements it in memory for tests.

mod interface;
pub mod mock;
mod query;

pub use interface::{CommitDiff, CommitInfo, Git, GitError, ObjectKind};
pub use query::RepoQuery;
