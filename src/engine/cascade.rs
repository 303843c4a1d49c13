use std::collections::BTreeSet;

use tracing::{debug, error};

use crate::error::Result;
use crate::oracle::GeometryOracle;
use crate::registry::CurveRegistry;
use crate::scene::{CurveHandle, SceneDatabase};
use crate::transaction::Transaction;

use super::Engine;

/// Marks `handle` removed and every curve reachable from it through the
/// touched graph dirty.
///
/// The walk tolerates cycles: a curve already in `dirty` is not expanded
/// again. The removed curve itself never lands in `dirty`.
pub fn cascade(registry: &CurveRegistry, handle: CurveHandle, transaction: &mut Transaction) {
    transaction.removed.insert(handle);
    let Some(info) = registry.lookup(handle) else {
        return;
    };

    let mut walk: Vec<CurveHandle> = info.touched().iter().copied().collect();
    while let Some(touchee) = walk.pop() {
        if touchee == handle || !transaction.dirty.insert(touchee) {
            continue;
        }
        if let Some(next) = registry.lookup(touchee) {
            walk.extend(next.touched().iter().copied());
        }
    }
}

impl<O, S> Engine<'_, O, S>
where
    O: GeometryOracle + ?Sized,
    S: SceneDatabase + ?Sized,
{
    /// Applies a transaction.
    ///
    /// Every curve in `dirty ∪ removed` is retired first; only then are the
    /// surviving dirty curves re-added, followed by the pending additions.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a re-add. The remaining re-adds
    /// still run, so the arrangement stays consistent.
    pub fn commit(&mut self, transaction: &Transaction) -> Result<()> {
        for &handle in transaction.dirty.union(&transaction.removed) {
            self.retire(handle);
        }

        let mut first_error = None;
        let mut readded = BTreeSet::new();
        let pending = transaction
            .dirty
            .difference(&transaction.removed)
            .chain(transaction.added.iter());
        for &handle in pending {
            if !readded.insert(handle) {
                continue;
            }
            if let Err(err) = self.add(handle) {
                error!(?handle, %err, "failed to add curve");
                first_error.get_or_insert(err);
            }
        }
        debug!(
            retired = transaction.dirty.len() + transaction.removed.len(),
            added = readded.len(),
            "transaction committed"
        );
        first_error.map_or(Ok(()), Err)
    }
}
