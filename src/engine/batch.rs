//! engine::batch
//!
//! Per-invocation bookkeeping shared by every change in one push.
//!
//! Attribution for a branch must know which other branches were part of the
//! same push and whether their mail has gone out yet, so that a commit is
//! described in detail exactly once across the batch.

use std::collections::{HashMap, HashSet};

use super::change::Change;
use crate::core::types::RefName;

/// Changes in the current batch and which of them are done.
#[derive(Debug, Default)]
pub struct BatchContext {
    all_changes: HashMap<RefName, Change>,
    processed: HashSet<RefName>,
}

impl BatchContext {
    /// Record every change of the batch. A refname that appears twice keeps
    /// its last change.
    pub fn new<'a>(changes: impl IntoIterator<Item = &'a Change>) -> Self {
        let all_changes = changes
            .into_iter()
            .map(|c| (c.refname.clone(), c.clone()))
            .collect();
        Self {
            all_changes,
            processed: HashSet::new(),
        }
    }

    /// The batch's change for `refname`, if it has one.
    pub fn get(&self, refname: &RefName) -> Option<&Change> {
        self.all_changes.get(refname)
    }

    /// A change in this batch whose notifications have not been sent yet.
    pub fn pending(&self, refname: &RefName) -> Option<&Change> {
        if self.processed.contains(refname) {
            None
        } else {
            self.all_changes.get(refname)
        }
    }

    pub fn is_processed(&self, refname: &RefName) -> bool {
        self.processed.contains(refname)
    }

    /// Mark a ref as fully emitted.
    pub fn mark_processed(&mut self, refname: &RefName) {
        self.processed.insert(refname.clone());
    }

    pub fn len(&self) -> usize {
        self.all_changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Oid;
    use crate::engine::change::{ChangeKind, ReferenceTransition};

    fn change(refname: &str, new: u8) -> Change {
        let t = ReferenceTransition::new(
            RefName::new(refname).unwrap(),
            None,
            Some(Oid::new(format!("{:040x}", new)).unwrap()),
        );
        Change::new(ChangeKind::BranchCreate, &t)
    }

    #[test]
    fn pending_until_processed() {
        let changes = [change("refs/heads/a", 1), change("refs/heads/b", 2)];
        let mut batch = BatchContext::new(&changes);
        let a = RefName::new("refs/heads/a").unwrap();

        assert!(batch.pending(&a).is_some());
        batch.mark_processed(&a);
        assert!(batch.pending(&a).is_none());
        assert!(batch.get(&a).is_some());
        assert!(batch.is_processed(&a));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn duplicate_refname_keeps_last() {
        let changes = [change("refs/heads/a", 1), change("refs/heads/a", 2)];
        let batch = BatchContext::new(&changes);
        let a = RefName::new("refs/heads/a").unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.get(&a).unwrap().new, changes[1].new);
    }

    #[test]
    fn unknown_ref_is_not_pending() {
        let batch = BatchContext::default();
        assert!(batch.is_empty());
        assert!(batch
            .pending(&RefName::new("refs/heads/x").unwrap())
            .is_none());
    }
}
