//! engine::change
//!
//! The typed description of one reference update.

use std::collections::BTreeSet;

use crate::core::types::{Oid, RefName};

/// One line of hook input, before any revision is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransition {
    pub old: String,
    pub new: String,
    pub refname: String,
}

impl RawTransition {
    pub fn new(old: impl Into<String>, new: impl Into<String>, refname: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
            refname: refname.into(),
        }
    }
}

/// The shape of an update: which sides are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Create,
    Update,
    Delete,
}

/// A resolved reference update.
///
/// `None` on either side means the ref did not exist before (old) or no
/// longer exists (new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTransition {
    pub refname: RefName,
    pub old: Option<Oid>,
    pub new: Option<Oid>,
}

impl ReferenceTransition {
    pub fn new(refname: RefName, old: Option<Oid>, new: Option<Oid>) -> Self {
        Self { refname, old, new }
    }

    /// Shape of the update, or `None` when both sides are absent.
    pub fn change_type(&self) -> Option<ChangeType> {
        match (&self.old, &self.new) {
            (None, Some(_)) => Some(ChangeType::Create),
            (Some(_), Some(_)) => Some(ChangeType::Update),
            (Some(_), None) => Some(ChangeType::Delete),
            (None, None) => None,
        }
    }

    /// The object whose kind decides the classification: new if present,
    /// else old.
    pub fn target(&self) -> Option<&Oid> {
        self.new.as_ref().or(self.old.as_ref())
    }
}

/// Every kind of reference change refmail knows how to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    BranchCreate,
    BranchUpdate,
    BranchDelete,
    AnnotatedTagCreate,
    AnnotatedTagUpdate,
    AnnotatedTagDelete,
    LightweightTagCreate,
    LightweightTagUpdate,
    LightweightTagDelete,
    InvalidRefDelete,
    MiscCreate,
    MiscUpdate,
    MiscDelete,
}

impl ChangeKind {
    /// Branch creations and updates: the kinds that get commit attribution
    /// and per-commit mail.
    pub fn has_commits(&self) -> bool {
        matches!(self, ChangeKind::BranchCreate | ChangeKind::BranchUpdate)
    }

    pub fn is_annotated_tag(&self) -> bool {
        matches!(
            self,
            ChangeKind::AnnotatedTagCreate
                | ChangeKind::AnnotatedTagUpdate
                | ChangeKind::AnnotatedTagDelete
        )
    }

    pub fn is_misc(&self) -> bool {
        matches!(
            self,
            ChangeKind::MiscCreate | ChangeKind::MiscUpdate | ChangeKind::MiscDelete
        )
    }
}

/// A classified reference update, owned by one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub refname: RefName,
    /// `refname` without its `refs/<category>/` prefix
    pub short_refname: String,
    pub old: Option<Oid>,
    pub new: Option<Oid>,
    /// Extra recipients for this change's main message
    pub cc: BTreeSet<String>,
    /// Why a Misc change is unexpected
    pub anomaly: Option<String>,
}

impl Change {
    pub fn new(kind: ChangeKind, transition: &ReferenceTransition) -> Self {
        Self {
            kind,
            short_refname: transition.refname.short_name().to_string(),
            refname: transition.refname.clone(),
            old: transition.old.clone(),
            new: transition.new.clone(),
            cc: BTreeSet::new(),
            anomaly: None,
        }
    }

    pub fn is_creation(&self) -> bool {
        self.old.is_none() && self.new.is_some()
    }
}
