//! engine::classify
//!
//! Decide what kind of change a reference update is.
//!
//! Classification looks only at which sides of the update exist, the ref's
//! namespace, and the kind of object the ref now (or last) pointed at. It
//! never fails: anything unexpected becomes a Misc change whose `anomaly`
//! says why.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::change::{Change, ChangeKind, ChangeType, ReferenceTransition};
use crate::core::types::RefNamespace;
use crate::git::ObjectKind;

static RELEASE_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^gnome-[0-9]+-[0-9]+$").expect("static regex compiles"));

/// Whether a branch short name follows the stable release naming scheme.
///
/// # Example
///
/// ```
/// use refmail::engine::classify::is_release_branch;
///
/// assert!(is_release_branch("gnome-3-8"));
/// assert!(!is_release_branch("gnome-3-8-fixes"));
/// assert!(!is_release_branch("master"));
/// ```
pub fn is_release_branch(short_refname: &str) -> bool {
    RELEASE_BRANCH.is_match(short_refname)
}

/// Turns reference transitions into [`Change`]s.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    /// Recipients added when a release branch is created
    release_cc: BTreeSet<String>,
}

impl Classifier {
    /// Create a classifier that copies `release_cc` onto release branch
    /// creations.
    pub fn new(release_cc: impl IntoIterator<Item = String>) -> Self {
        Self {
            release_cc: release_cc.into_iter().collect(),
        }
    }

    /// Classify one transition.
    ///
    /// `object_kind` is the kind of [`ReferenceTransition::target`]; it is
    /// ignored (and may be `None`) when both sides are absent.
    pub fn classify(
        &self,
        transition: &ReferenceTransition,
        object_kind: Option<ObjectKind>,
    ) -> Change {
        let change_type = match transition.change_type() {
            Some(t) => t,
            None => return Change::new(ChangeKind::InvalidRefDelete, transition),
        };
        let kind = object_kind.unwrap_or(ObjectKind::Other);
        let target = transition
            .target()
            .map(|oid| oid.to_string())
            .unwrap_or_default();

        let by_shape = |create, update, delete| match change_type {
            ChangeType::Create => create,
            ChangeType::Update => update,
            ChangeType::Delete => delete,
        };
        let misc = |message: String| {
            let mut change = Change::new(
                by_shape(
                    ChangeKind::MiscCreate,
                    ChangeKind::MiscUpdate,
                    ChangeKind::MiscDelete,
                ),
                transition,
            );
            change.anomaly = Some(message);
            change
        };

        match transition.refname.namespace() {
            RefNamespace::Tags => match kind {
                ObjectKind::Commit => Change::new(
                    by_shape(
                        ChangeKind::LightweightTagCreate,
                        ChangeKind::LightweightTagUpdate,
                        ChangeKind::LightweightTagDelete,
                    ),
                    transition,
                ),
                ObjectKind::Tag => Change::new(
                    by_shape(
                        ChangeKind::AnnotatedTagCreate,
                        ChangeKind::AnnotatedTagUpdate,
                        ChangeKind::AnnotatedTagDelete,
                    ),
                    transition,
                ),
                _ => misc(format!("{target} is not a commit or tag object")),
            },
            RefNamespace::Heads => match kind {
                ObjectKind::Commit => {
                    let mut change = Change::new(
                        by_shape(
                            ChangeKind::BranchCreate,
                            ChangeKind::BranchUpdate,
                            ChangeKind::BranchDelete,
                        ),
                        transition,
                    );
                    if change.kind == ChangeKind::BranchCreate
                        && is_release_branch(&change.short_refname)
                    {
                        change.cc.extend(self.release_cc.iter().cloned());
                    }
                    change
                }
                _ => misc(format!("{target} is not a commit object")),
            },
            RefNamespace::Remotes => misc(format!(
                "'{}' is a tracking branch and doesn't belong on the server",
                transition.refname
            )),
            RefNamespace::Other => misc(format!(
                "'{}' is not in refs/heads/ or refs/tags/",
                transition.refname
            )),
        }
    }
}
