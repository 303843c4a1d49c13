//! The arrangement algorithms: add, cascade and commit.
//!
//! The engine borrows the registry, the scene and the oracle for the
//! duration of one operation. It never holds state of its own.

mod add;
mod cascade;

pub use cascade::cascade;

use crate::config::NetworkConfig;
use crate::oracle::GeometryOracle;
use crate::registry::{CurveInfo, CurveRegistry};
use crate::scene::{Agent, CurveHandle, SceneDatabase};

/// One arrangement update over borrowed state.
pub struct Engine<'a, O: ?Sized, S: ?Sized> {
    oracle: &'a O,
    scene: &'a mut S,
    registry: &'a mut CurveRegistry,
    config: &'a NetworkConfig,
}

impl<'a, O, S> Engine<'a, O, S>
where
    O: GeometryOracle + ?Sized,
    S: SceneDatabase + ?Sized,
{
    /// Creates an engine over the given state.
    pub fn new(
        oracle: &'a O,
        scene: &'a mut S,
        registry: &'a mut CurveRegistry,
        config: &'a NetworkConfig,
    ) -> Self {
        Self {
            oracle,
            scene,
            registry,
            config,
        }
    }

    /// Drops a curve's bookkeeping and withdraws its fragments.
    fn retire(&mut self, handle: CurveHandle) -> Option<CurveInfo> {
        let info = self.registry.unregister(handle)?;
        for fragment in &info.fragments {
            self.scene.remove_fragment(*fragment, Agent::Automatic);
        }
        Some(info)
    }
}
