use std::collections::BTreeSet;

use slotmap::{SecondaryMap, SlotMap};

use crate::config::NetworkConfig;
use crate::geometry::{Curve2d, Plane};
use crate::scene::{CurveHandle, FragmentHandle};

slotmap::new_key_type! {
    /// Unique identifier for a canonical plane in the registry.
    pub struct PlaneId;
}

/// Identity of a planar curve, distinct from the handle of the user curve
/// it was derived from. A fresh id is allocated on every registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanarCurveId(u64);

impl PlanarCurveId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A user curve flattened onto its canonical plane.
#[derive(Debug, Clone)]
pub struct PlanarCurve {
    /// Identity of this projection.
    pub id: PlanarCurveId,
    /// Geometry in the canonical plane's coordinates.
    pub curve: Curve2d,
}

/// A parameter on one curve of a joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointOnCurve {
    pub curve: CurveHandle,
    pub t: f64,
    pub t_min: f64,
    pub t_max: f64,
}

/// Two curves meeting where one of them ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub on1: PointOnCurve,
    pub on2: PointOnCurve,
}

/// Joints at the two ends of an open curve.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Joints {
    pub start: Option<Joint>,
    pub stop: Option<Joint>,
}

/// Bookkeeping for one registered curve.
#[derive(Debug, Clone)]
pub struct CurveInfo {
    pub(crate) planar_curve: PlanarCurve,
    pub(crate) plane: PlaneId,
    pub(crate) touched: BTreeSet<CurveHandle>,
    pub(crate) fragments: Vec<FragmentHandle>,
    pub(crate) joints: Joints,
}

impl CurveInfo {
    /// Creates bookkeeping for a freshly projected curve.
    #[must_use]
    pub fn new(planar_curve: PlanarCurve, plane: PlaneId) -> Self {
        Self {
            planar_curve,
            plane,
            touched: BTreeSet::new(),
            fragments: Vec::new(),
            joints: Joints::default(),
        }
    }

    /// The curve's projection.
    #[must_use]
    pub fn planar_curve(&self) -> &PlanarCurve {
        &self.planar_curve
    }

    /// The canonical plane the curve lies in.
    #[must_use]
    pub fn plane(&self) -> PlaneId {
        self.plane
    }

    /// Curves whose fragmentation depends on this one, and vice versa.
    #[must_use]
    pub fn touched(&self) -> &BTreeSet<CurveHandle> {
        &self.touched
    }

    /// Currently published fragments, in parameter order.
    #[must_use]
    pub fn fragments(&self) -> &[FragmentHandle] {
        &self.fragments
    }

    /// Joints at the curve's ends.
    #[must_use]
    pub fn joints(&self) -> &Joints {
        &self.joints
    }
}

/// Captured registry state, restorable with [`CurveRegistry::restore`].
#[derive(Debug, Clone)]
pub struct RegistryMemento(CurveRegistry);

/// Per-curve bookkeeping and the canonical plane set.
///
/// The plane set is minimal: no two registered planes are coincident. It
/// starts with the world XY plane and only grows until [`clear`].
///
/// [`clear`]: CurveRegistry::clear
#[derive(Debug, Clone)]
pub struct CurveRegistry {
    infos: SecondaryMap<CurveHandle, CurveInfo>,
    planes: SlotMap<PlaneId, Plane>,
    next_planar_id: u64,
    plane_tolerance: f64,
}

impl CurveRegistry {
    /// Creates an empty registry seeded with the world XY plane.
    #[must_use]
    pub fn new(config: &NetworkConfig) -> Self {
        let mut planes = SlotMap::with_key();
        planes.insert(Plane::world_xy());
        Self {
            infos: SecondaryMap::new(),
            planes,
            next_planar_id: 0,
            plane_tolerance: config.plane_tolerance(),
        }
    }

    /// Maps `plane` onto its canonical registered plane, registering it if
    /// no coincident plane exists yet.
    ///
    /// When an existing plane is reused, `curve` is rewritten into that
    /// plane's coordinates.
    pub fn normalize_plane(&mut self, curve: &mut Curve2d, plane: &Plane) -> PlaneId {
        let existing = self
            .planes
            .iter()
            .find(|(_, registered)| registered.is_coincident(plane, self.plane_tolerance));
        match existing {
            Some((id, registered)) => {
                if registered != plane {
                    *curve = curve.transformed(&plane.transform_to(registered));
                }
                id
            }
            None => self.planes.insert(plane.clone()),
        }
    }

    /// Allocates a fresh planar curve id.
    pub fn allocate_id(&mut self) -> PlanarCurveId {
        self.next_planar_id += 1;
        PlanarCurveId::new(self.next_planar_id)
    }

    /// Registers a curve, returning the info it replaced, if any.
    pub fn register(
        &mut self,
        handle: CurveHandle,
        planar_curve: PlanarCurve,
        plane: PlaneId,
    ) -> Option<CurveInfo> {
        self.infos.insert(handle, CurveInfo::new(planar_curve, plane))
    }

    /// Returns the bookkeeping for a curve.
    #[must_use]
    pub fn lookup(&self, handle: CurveHandle) -> Option<&CurveInfo> {
        self.infos.get(handle)
    }

    pub(crate) fn lookup_mut(&mut self, handle: CurveHandle) -> Option<&mut CurveInfo> {
        self.infos.get_mut(handle)
    }

    /// Removes a curve and scrubs it from every neighbour's touched set.
    pub fn unregister(&mut self, handle: CurveHandle) -> Option<CurveInfo> {
        let info = self.infos.remove(handle)?;
        for neighbour in &info.touched {
            if let Some(other) = self.infos.get_mut(*neighbour) {
                other.touched.remove(&handle);
            }
        }
        Some(info)
    }

    /// Records that `a` and `b` intersect. Both must be registered.
    pub fn touch(&mut self, a: CurveHandle, b: CurveHandle) {
        if a == b || !self.infos.contains_key(a) || !self.infos.contains_key(b) {
            return;
        }
        if let Some(info) = self.infos.get_mut(a) {
            info.touched.insert(b);
        }
        if let Some(info) = self.infos.get_mut(b) {
            info.touched.insert(a);
        }
    }

    /// Every registered curve on `plane`, with its projection.
    #[must_use]
    pub fn on_plane(&self, plane: PlaneId) -> Vec<(CurveHandle, &PlanarCurve)> {
        self.infos
            .iter()
            .filter(|(_, info)| info.plane == plane)
            .map(|(handle, info)| (handle, &info.planar_curve))
            .collect()
    }

    /// Geometry of every curve on a plane coincident with `plane`.
    #[must_use]
    pub fn find_with_same_plane(&self, plane: PlaneId) -> Vec<&Curve2d> {
        let Some(target) = self.planes.get(plane) else {
            return Vec::new();
        };
        self.infos
            .values()
            .filter(|info| {
                self.planes
                    .get(info.plane)
                    .is_some_and(|p| p.is_coincident(target, self.plane_tolerance))
            })
            .map(|info| &info.planar_curve.curve)
            .collect()
    }

    /// Returns a registered plane.
    #[must_use]
    pub fn plane(&self, id: PlaneId) -> Option<&Plane> {
        self.planes.get(id)
    }

    /// Every registered plane.
    pub fn planes(&self) -> impl Iterator<Item = (PlaneId, &Plane)> {
        self.planes.iter()
    }

    /// Number of registered curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Whether no curve is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Whether `handle` is registered.
    #[must_use]
    pub fn contains(&self, handle: CurveHandle) -> bool {
        self.infos.contains_key(handle)
    }

    /// Every registered handle.
    #[must_use]
    pub fn handles(&self) -> Vec<CurveHandle> {
        self.infos.keys().collect()
    }

    /// Captures the whole registry.
    #[must_use]
    pub fn snapshot(&self) -> RegistryMemento {
        RegistryMemento(self.clone())
    }

    /// Replaces the registry with a captured state.
    pub fn restore(&mut self, memento: RegistryMemento) {
        *self = memento.0;
    }

    /// Forgets every curve and plane, then reseeds the world XY plane.
    pub fn clear(&mut self) {
        self.infos.clear();
        self.planes.clear();
        self.planes.insert(Plane::world_xy());
    }
}

impl Default for CurveRegistry {
    fn default() -> Self {
        Self::new(&NetworkConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::math::{Point2, Point3, Vector3};

    fn handles(n: usize) -> Vec<CurveHandle> {
        let mut map: SlotMap<CurveHandle, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn segment() -> Curve2d {
        Curve2d::segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).unwrap()
    }

    fn register(registry: &mut CurveRegistry, handle: CurveHandle) -> PlanarCurveId {
        let mut curve = segment();
        let plane = registry.normalize_plane(&mut curve, &Plane::world_xy());
        let id = registry.allocate_id();
        registry.register(handle, PlanarCurve { id, curve }, plane);
        id
    }

    #[test]
    fn world_xy_is_seeded() {
        let registry = CurveRegistry::default();
        assert_eq!(registry.planes().count(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn normalize_plane_is_idempotent() {
        let mut registry = CurveRegistry::default();
        let tilted = Plane::from_normal(Point3::new(0.0, 0.0, 5.0), Vector3::new(1.0, 0.0, 1.0))
            .unwrap();
        let mut first = segment();
        let mut second = segment();
        let a = registry.normalize_plane(&mut first, &tilted);
        let b = registry.normalize_plane(&mut second, &tilted);
        assert_eq!(a, b);
        assert_eq!(first, second);
        assert_eq!(registry.planes().count(), 2);
    }

    #[test]
    fn coincident_plane_maps_curve_into_canonical_frame() {
        let mut registry = CurveRegistry::default();
        let flipped = Plane::from_normal(Point3::new(3.0, 4.0, 0.0), -Vector3::z()).unwrap();
        let mut curve = segment();
        let world_start = flipped.to_world(&Point2::new(0.0, 0.0));
        let id = registry.normalize_plane(&mut curve, &flipped);

        assert_eq!(registry.planes().count(), 1);
        let canonical = registry.plane(id).unwrap();
        match curve {
            Curve2d::Segment { start, .. } => {
                let back = canonical.to_world(&start);
                assert!((back - world_start).norm() < 1e-12);
            }
            other => panic!("expected segment, got {other:?}"),
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = CurveRegistry::default();
        let h = handles(1)[0];
        let id = register(&mut registry, h);
        assert!(registry.contains(h));
        assert_eq!(registry.lookup(h).unwrap().planar_curve().id, id);
    }

    #[test]
    fn planar_ids_are_fresh_on_reregistration() {
        let mut registry = CurveRegistry::default();
        let h = handles(1)[0];
        let first = register(&mut registry, h);
        let second = register(&mut registry, h);
        assert_ne!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(h).unwrap().planar_curve().id, second);
    }

    #[test]
    fn unregister_scrubs_touched() {
        let mut registry = CurveRegistry::default();
        let hs = handles(3);
        for &h in &hs {
            register(&mut registry, h);
        }
        registry.touch(hs[0], hs[1]);
        registry.touch(hs[1], hs[2]);
        assert!(registry.lookup(hs[1]).unwrap().touched().contains(&hs[0]));

        registry.unregister(hs[1]).unwrap();
        assert!(registry.lookup(hs[0]).unwrap().touched().is_empty());
        assert!(registry.lookup(hs[2]).unwrap().touched().is_empty());
        assert!(registry.unregister(hs[1]).is_none());
    }

    #[test]
    fn find_with_same_plane_filters_by_plane() {
        let mut registry = CurveRegistry::default();
        let hs = handles(2);
        register(&mut registry, hs[0]);

        let raised = Plane::world_xy().through(&Point3::new(0.0, 0.0, 2.0));
        let mut curve = segment();
        let plane = registry.normalize_plane(&mut curve, &raised);
        let id = registry.allocate_id();
        registry.register(hs[1], PlanarCurve { id, curve }, plane);

        assert_eq!(registry.find_with_same_plane(plane).len(), 1);
        let xy = registry.lookup(hs[0]).unwrap().plane();
        assert_eq!(registry.find_with_same_plane(xy).len(), 1);
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let mut registry = CurveRegistry::default();
        let hs = handles(2);
        register(&mut registry, hs[0]);
        let memento = registry.snapshot();
        register(&mut registry, hs[1]);
        assert_eq!(registry.len(), 2);

        registry.restore(memento);
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains(hs[1]));
    }

    #[test]
    fn clear_reseeds_default_plane() {
        let mut registry = CurveRegistry::default();
        let h = handles(1)[0];
        let raised = Plane::world_xy().through(&Point3::new(0.0, 0.0, 9.0));
        let mut curve = segment();
        let plane = registry.normalize_plane(&mut curve, &raised);
        let id = registry.allocate_id();
        registry.register(h, PlanarCurve { id, curve }, plane);

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.planes().count(), 1);
    }
}
