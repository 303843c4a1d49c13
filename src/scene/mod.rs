mod memory;

pub use memory::{MemoryScene, OperationCounts};

use crate::geometry::{Curve2d, Curve3d, Plane};
use crate::oracle::Region;

slotmap::new_key_type! {
    /// Unique identifier for a user curve in the scene database.
    pub struct CurveHandle;
}

slotmap::new_key_type! {
    /// Unique identifier for a materialized fragment view.
    pub struct FragmentHandle;
}

slotmap::new_key_type! {
    /// Unique identifier for a materialized region view.
    pub struct RegionHandle;
}

/// Who issued a scene mutation.
///
/// Fragments and regions created by the arrangement are tagged
/// [`Agent::Automatic`] so that a history system can tell them apart from
/// edits made by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Agent {
    /// A direct user edit.
    User,
    /// Derived data maintained by the arrangement.
    Automatic,
}

/// Parameter value marking a fragment that spans its whole, unsplit curve.
pub const WHOLE_CURVE: f64 = -1.0;

/// A trimmed sub-piece of a user curve.
#[derive(Debug, Clone)]
pub struct FragmentView {
    /// The curve this fragment was cut from.
    pub parent: CurveHandle,
    /// Start parameter on the parent, or [`WHOLE_CURVE`].
    pub start: f64,
    /// Stop parameter on the parent, or [`WHOLE_CURVE`].
    pub stop: f64,
    /// Plane the fragment lies in.
    pub plane: Plane,
    /// Fragment geometry in plane coordinates.
    pub curve: Curve2d,
}

impl FragmentView {
    /// Whether this fragment covers its whole parent curve.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_whole(&self) -> bool {
        self.start == WHOLE_CURVE && self.stop == WHOLE_CURVE
    }
}

/// A filled region on a plane.
#[derive(Debug, Clone)]
pub struct RegionView {
    /// Plane the region lies in.
    pub plane: Plane,
    /// Boundary loops in plane coordinates.
    pub region: Region,
}

/// The host's object database, as seen by the arrangement.
///
/// The arrangement never owns curve geometry; it reads user curves through
/// this trait and publishes its derived fragments and regions back into it.
pub trait SceneDatabase {
    /// Returns the geometry of a user curve.
    fn curve(&self, handle: CurveHandle) -> Option<&Curve3d>;

    /// Every user curve currently in the scene.
    fn curve_handles(&self) -> Vec<CurveHandle>;

    /// Publishes a fragment and returns its handle.
    fn add_fragment(&mut self, view: FragmentView, agent: Agent) -> FragmentHandle;

    /// Withdraws a fragment. Returns `None` if it did not exist.
    fn remove_fragment(&mut self, handle: FragmentHandle, agent: Agent) -> Option<FragmentView>;

    /// Returns a published fragment.
    fn fragment(&self, handle: FragmentHandle) -> Option<&FragmentView>;

    /// Whether a fragment handle is live.
    fn contains_fragment(&self, handle: FragmentHandle) -> bool {
        self.fragment(handle).is_some()
    }

    /// Publishes a region and returns its handle.
    fn add_region(&mut self, view: RegionView, agent: Agent) -> RegionHandle;

    /// Withdraws a region. Returns `None` if it did not exist.
    fn remove_region(&mut self, handle: RegionHandle, agent: Agent) -> Option<RegionView>;

    /// Every published region.
    fn regions(&self) -> Vec<(RegionHandle, &RegionView)>;
}
