use std::collections::BTreeSet;

use crate::engine::cascade;
use crate::registry::CurveRegistry;
use crate::scene::CurveHandle;

/// Net changes recorded during one logical user action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Curves whose fragments must be recomputed because a neighbour changed.
    pub dirty: BTreeSet<CurveHandle>,
    /// Curves to integrate at commit.
    pub added: BTreeSet<CurveHandle>,
    /// Curves to drop at commit.
    pub removed: BTreeSet<CurveHandle>,
}

impl Transaction {
    /// Creates an empty transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// Records an addition.
    ///
    /// A curve that is already registered is cascaded first, so its old
    /// bookkeeping and everything cut against it are recomputed.
    pub fn record_add(&mut self, registry: &CurveRegistry, handle: CurveHandle) {
        if registry.contains(handle) && !self.removed.contains(&handle) {
            cascade(registry, handle, self);
        }
        self.added.insert(handle);
    }

    /// Records a removal, cascading immediately so later records in the same
    /// transaction see what is already invalidated.
    ///
    /// Removing a curve added earlier in the transaction cancels that add.
    pub fn record_remove(&mut self, registry: &CurveRegistry, handle: CurveHandle) {
        self.added.remove(&handle);
        cascade(registry, handle, self);
    }
}
