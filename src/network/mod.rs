//! The transaction coordinator.
//!
//! [`CurveNetwork`] owns the curve registry and serializes every update to
//! the arrangement. Changes are recorded into a [`Transaction`] and applied
//! in one commit, after which the regions of every affected plane are
//! rebuilt.
//!
//! ```ignore
//! let mut network = CurveNetwork::new(PlanarKernel::default(), MemoryScene::new());
//! let a = network.scene_mut().add_curve(Arc::circle(center, 0.5, normal)?);
//! let b = network.scene_mut().add_curve(Arc::circle(other, 0.5, normal)?);
//! network.transaction(|net| {
//!     net.add(a)?;
//!     net.add(b)
//! })?;
//! ```

mod events;

pub use events::CurveEvent;

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, error, info_span, warn};

use crate::config::NetworkConfig;
use crate::engine::Engine;
use crate::error::{ContractError, Result};
use crate::oracle::GeometryOracle;
use crate::registry::{CurveRegistry, PlaneId, RegistryMemento};
use crate::regions;
use crate::scene::{CurveHandle, SceneDatabase};
use crate::transaction::Transaction;

#[derive(Debug)]
enum State {
    Idle,
    Transaction(Transaction),
}

/// An incremental arrangement of planar curves.
pub struct CurveNetwork<O, S> {
    oracle: O,
    scene: S,
    registry: CurveRegistry,
    config: NetworkConfig,
    state: State,
    hidden: BTreeSet<CurveHandle>,
    events: VecDeque<CurveEvent>,
}

impl<O, S> CurveNetwork<O, S>
where
    O: GeometryOracle,
    S: SceneDatabase,
{
    /// Creates a network with the default tolerances.
    #[must_use]
    pub fn new(oracle: O, scene: S) -> Self {
        Self::with_config(oracle, scene, NetworkConfig::default())
    }

    /// Creates a network with explicit tolerances.
    #[must_use]
    pub fn with_config(oracle: O, scene: S, config: NetworkConfig) -> Self {
        Self {
            oracle,
            scene,
            registry: CurveRegistry::new(&config),
            config,
            state: State::Idle,
            hidden: BTreeSet::new(),
            events: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable access to the scene, for inserting and deleting user curves.
    ///
    /// The arrangement only learns about such edits through [`add`],
    /// [`remove`] or a queued [`CurveEvent`].
    ///
    /// [`add`]: Self::add
    /// [`remove`]: Self::remove
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    #[must_use]
    pub fn registry(&self) -> &CurveRegistry {
        &self.registry
    }

    /// Whether a transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        matches!(self.state, State::Transaction(_))
    }

    /// Whether a curve is currently hidden.
    #[must_use]
    pub fn is_hidden(&self, handle: CurveHandle) -> bool {
        self.hidden.contains(&handle)
    }

    /// Runs `body` inside a transaction and commits what it recorded.
    ///
    /// If `body` fails, the recorded changes are discarded and nothing is
    /// committed. The network is back to idle when this returns, whatever
    /// the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NestedTransaction`] if a transaction is
    /// already open, the error of `body`, or the first error of the commit.
    pub fn transaction<R>(&mut self, body: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if self.in_transaction() {
            return Err(ContractError::NestedTransaction.into());
        }
        self.state = State::Transaction(Transaction::new());
        let outcome = body(self);
        let transaction = match std::mem::replace(&mut self.state, State::Idle) {
            State::Transaction(transaction) => transaction,
            State::Idle => Transaction::new(),
        };

        match outcome {
            Ok(value) => {
                self.settle(&transaction)?;
                Ok(value)
            }
            Err(err) => {
                warn!(%err, "transaction abandoned");
                Err(err)
            }
        }
    }

    /// Commits a transaction and rebuilds the regions of every plane it
    /// touched.
    fn settle(&mut self, transaction: &Transaction) -> Result<()> {
        if transaction.is_empty() {
            return Ok(());
        }
        let span = info_span!(
            "commit",
            dirty = transaction.dirty.len(),
            added = transaction.added.len(),
            removed = transaction.removed.len()
        );
        let _guard = span.enter();

        // Step 1: planes losing curves, read before the registry changes
        let mut planes: BTreeSet<PlaneId> = transaction
            .dirty
            .union(&transaction.removed)
            .filter_map(|h| self.registry.lookup(*h).map(|info| info.plane()))
            .collect();

        // Step 2: commit
        let committed = Engine::new(
            &self.oracle,
            &mut self.scene,
            &mut self.registry,
            &self.config,
        )
        .commit(transaction);

        // Step 3: planes gaining curves
        planes.extend(
            transaction
                .added
                .iter()
                .filter_map(|h| self.registry.lookup(*h).map(|info| info.plane())),
        );

        // Step 4: regions
        let mut first_error = committed.err();
        for plane in planes {
            if let Err(err) = regions::rebuild(
                &self.oracle,
                &mut self.scene,
                &self.registry,
                plane,
                self.config.plane_tolerance(),
            ) {
                error!(?plane, %err, "region rebuild failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Records a change into the open transaction, or runs it as a
    /// transaction of its own when none is open.
    fn record(&mut self, change: impl FnOnce(&mut Transaction, &CurveRegistry)) -> Result<()> {
        if let State::Transaction(transaction) = &mut self.state {
            change(transaction, &self.registry);
            return Ok(());
        }
        self.transaction(|net| net.record(change))
    }

    /// Integrates a user curve into the arrangement.
    ///
    /// # Errors
    ///
    /// Outside a transaction, returns the error of the implicit commit.
    pub fn add(&mut self, handle: CurveHandle) -> Result<()> {
        self.record(|transaction, registry| transaction.record_add(registry, handle))
    }

    /// Drops a user curve from the arrangement.
    ///
    /// # Errors
    ///
    /// Outside a transaction, returns the error of the implicit commit.
    pub fn remove(&mut self, handle: CurveHandle) -> Result<()> {
        self.record(|transaction, registry| transaction.record_remove(registry, handle))
    }

    /// Swaps one user curve for another.
    ///
    /// # Errors
    ///
    /// Outside a transaction, returns the error of the implicit commit.
    pub fn replace(&mut self, from: CurveHandle, to: CurveHandle) -> Result<()> {
        self.record(|transaction, registry| {
            transaction.record_remove(registry, from);
            transaction.record_add(registry, to);
        })
    }

    /// Hides or shows a user curve. Hidden curves leave the arrangement and
    /// are skipped by [`rebuild_all`](Self::rebuild_all).
    ///
    /// # Errors
    ///
    /// Outside a transaction, returns the error of the implicit commit.
    pub fn set_hidden(&mut self, handle: CurveHandle, hidden: bool) -> Result<()> {
        if hidden {
            self.hidden.insert(handle);
            self.remove(handle)
        } else {
            self.hidden.remove(&handle);
            self.add(handle)
        }
    }

    /// Re-adds every visible user curve of the scene.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::TransactionRequired`] when called outside a
    /// transaction.
    pub fn rebuild_all(&mut self) -> Result<()> {
        if !self.in_transaction() {
            return Err(ContractError::TransactionRequired("rebuild_all").into());
        }
        let handles: Vec<CurveHandle> = self
            .scene
            .curve_handles()
            .into_iter()
            .filter(|h| !self.hidden.contains(h))
            .collect();
        debug!(curves = handles.len(), "rebuilding every curve");
        for handle in handles {
            self.add(handle)?;
        }
        Ok(())
    }

    /// Regenerates the regions of one plane from its current curves.
    ///
    /// Returns the number of regions published.
    ///
    /// # Errors
    ///
    /// Returns an error if the plane is unknown or the oracle fails.
    pub fn rebuild_regions(&mut self, plane: PlaneId) -> Result<usize> {
        regions::rebuild(
            &self.oracle,
            &mut self.scene,
            &self.registry,
            plane,
            self.config.plane_tolerance(),
        )
    }

    /// Queues a host event for [`process_events`](Self::process_events).
    pub fn submit(&mut self, event: CurveEvent) {
        self.events.push_back(event);
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Applies every queued event in arrival order, all inside one
    /// transaction. Inside an open transaction the events join it.
    ///
    /// Returns the number of events applied.
    ///
    /// # Errors
    ///
    /// Returns the error of the commit. Events queued after a failing one
    /// stay in the queue.
    pub fn process_events(&mut self) -> Result<usize> {
        if self.events.is_empty() {
            return Ok(0);
        }
        if self.in_transaction() {
            self.drain_events()
        } else {
            self.transaction(Self::drain_events)
        }
    }

    fn drain_events(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Some(event) = self.events.pop_front() {
            match event {
                CurveEvent::Added(handle) => self.add(handle)?,
                CurveEvent::Removed(handle) => self.remove(handle)?,
                CurveEvent::Replaced { from, to } => self.replace(from, to)?,
                CurveEvent::Hidden(handle) => self.set_hidden(handle, true)?,
                CurveEvent::Unhidden(handle) => self.set_hidden(handle, false)?,
            }
            applied += 1;
        }
        Ok(applied)
    }

    /// Checks the bookkeeping against the scene.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Corrupted`] describing the first
    /// inconsistency found.
    pub fn validate(&self) -> Result<()> {
        for handle in self.registry.handles() {
            let Some(info) = self.registry.lookup(handle) else {
                continue;
            };
            if self.scene.curve(handle).is_none() {
                return Err(corrupted(format!("{handle:?} is registered but not in the scene")));
            }
            if self.registry.plane(info.plane()).is_none() {
                return Err(corrupted(format!("{handle:?} lies on an unknown plane")));
            }
            if info.fragments().is_empty() {
                return Err(corrupted(format!("{handle:?} has no fragments")));
            }
            for fragment in info.fragments() {
                match self.scene.fragment(*fragment) {
                    Some(view) if view.parent == handle => {}
                    Some(_) => {
                        return Err(corrupted(format!(
                            "{fragment:?} is listed under {handle:?} but has another parent"
                        )));
                    }
                    None => {
                        return Err(corrupted(format!("{fragment:?} of {handle:?} is missing")));
                    }
                }
            }
            for other in info.touched() {
                let symmetric = self
                    .registry
                    .lookup(*other)
                    .is_some_and(|o| o.touched().contains(&handle));
                if !symmetric {
                    return Err(corrupted(format!(
                        "{handle:?} touches {other:?} but not the other way round"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Captures the curve bookkeeping.
    #[must_use]
    pub fn snapshot(&self) -> RegistryMemento {
        self.registry.snapshot()
    }

    /// Restores bookkeeping captured by [`snapshot`](Self::snapshot).
    ///
    /// The scene is not touched; the host restores its own fragments and
    /// regions.
    pub fn restore(&mut self, memento: RegistryMemento) {
        self.registry.restore(memento);
    }

    /// Drops all bookkeeping and queued events, e.g. when the document
    /// closes.
    pub fn close(&mut self) {
        debug!(curves = self.registry.len(), "network closed");
        self.registry.clear();
        self.hidden.clear();
        self.events.clear();
        self.state = State::Idle;
    }
}

fn corrupted(message: String) -> crate::error::SketchError {
    ContractError::Corrupted(message).into()
}
