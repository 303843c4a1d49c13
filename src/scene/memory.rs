use slotmap::SlotMap;

use crate::geometry::Curve3d;

use super::{
    Agent, CurveHandle, FragmentHandle, FragmentView, RegionHandle, RegionView, SceneDatabase,
};

/// Number of scene mutations issued per agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounts {
    /// Mutations made on behalf of the user.
    pub user: usize,
    /// Mutations made by the arrangement.
    pub automatic: usize,
}

impl OperationCounts {
    fn record(&mut self, agent: Agent) {
        match agent {
            Agent::User => self.user += 1,
            Agent::Automatic => self.automatic += 1,
        }
    }
}

/// In-memory scene database.
///
/// Owns user curves, fragment views and region views in generational
/// arenas.
#[derive(Debug, Default)]
pub struct MemoryScene {
    curves: SlotMap<CurveHandle, Curve3d>,
    fragments: SlotMap<FragmentHandle, FragmentView>,
    regions: SlotMap<RegionHandle, RegionView>,
    operations: OperationCounts,
}

impl MemoryScene {
    /// Creates a new, empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user curve and returns its handle.
    pub fn add_curve(&mut self, curve: impl Into<Curve3d>) -> CurveHandle {
        self.operations.record(Agent::User);
        self.curves.insert(curve.into())
    }

    /// Removes a user curve.
    pub fn remove_curve(&mut self, handle: CurveHandle) -> Option<Curve3d> {
        self.operations.record(Agent::User);
        self.curves.remove(handle)
    }

    /// Number of published fragments.
    #[must_use]
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Number of published regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Fragments cut from `parent`.
    #[must_use]
    pub fn fragments_of(&self, parent: CurveHandle) -> Vec<(FragmentHandle, &FragmentView)> {
        self.fragments
            .iter()
            .filter(|(_, view)| view.parent == parent)
            .collect()
    }

    /// Mutation counts per agent.
    #[must_use]
    pub fn operations(&self) -> OperationCounts {
        self.operations
    }
}

impl SceneDatabase for MemoryScene {
    fn curve(&self, handle: CurveHandle) -> Option<&Curve3d> {
        self.curves.get(handle)
    }

    fn curve_handles(&self) -> Vec<CurveHandle> {
        self.curves.keys().collect()
    }

    fn add_fragment(&mut self, view: FragmentView, agent: Agent) -> FragmentHandle {
        self.operations.record(agent);
        self.fragments.insert(view)
    }

    fn remove_fragment(&mut self, handle: FragmentHandle, agent: Agent) -> Option<FragmentView> {
        self.operations.record(agent);
        self.fragments.remove(handle)
    }

    fn fragment(&self, handle: FragmentHandle) -> Option<&FragmentView> {
        self.fragments.get(handle)
    }

    fn add_region(&mut self, view: RegionView, agent: Agent) -> RegionHandle {
        self.operations.record(agent);
        self.regions.insert(view)
    }

    fn remove_region(&mut self, handle: RegionHandle, agent: Agent) -> Option<RegionView> {
        self.operations.record(agent);
        self.regions.remove(handle)
    }

    fn regions(&self) -> Vec<(RegionHandle, &RegionView)> {
        self.regions.iter().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Curve2d, Line, Plane};
    use crate::math::{Point2, Point3};
    use crate::scene::WHOLE_CURVE;

    fn line() -> Line {
        Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn add_and_remove_curve() {
        let mut scene = MemoryScene::new();
        let handle = scene.add_curve(line());
        assert!(scene.curve(handle).is_some());
        assert_eq!(scene.curve_handles(), vec![handle]);
        assert!(scene.remove_curve(handle).is_some());
        assert!(scene.curve(handle).is_none());
        assert_eq!(scene.operations().user, 2);
    }

    #[test]
    fn fragments_are_counted_per_agent() {
        let mut scene = MemoryScene::new();
        let parent = scene.add_curve(line());
        let view = FragmentView {
            parent,
            start: WHOLE_CURVE,
            stop: WHOLE_CURVE,
            plane: Plane::world_xy(),
            curve: Curve2d::segment(Point2::origin(), Point2::new(1.0, 0.0)).unwrap(),
        };
        assert!(view.is_whole());
        let fragment = scene.add_fragment(view, Agent::Automatic);
        assert!(scene.contains_fragment(fragment));
        assert_eq!(scene.fragments_of(parent).len(), 1);

        assert!(scene.remove_fragment(fragment, Agent::Automatic).is_some());
        assert!(!scene.contains_fragment(fragment));
        assert!(scene.remove_fragment(fragment, Agent::Automatic).is_none());
        assert_eq!(
            scene.operations(),
            OperationCounts {
                user: 1,
                automatic: 3
            }
        );
    }
}
