//! The geometric kernel seam.
//!
//! The arrangement never solves intersections or fills regions itself; it
//! asks a [`GeometryOracle`]. All queries are pure and synchronous.

use crate::error::Result;
use crate::geometry::{Curve2d, Curve3d, Plane};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;
use crate::registry::PlanarCurveId;

/// A 3D curve flattened onto the plane it lies in.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Curve in the `(u, v)` coordinates of `plane`.
    pub curve: Curve2d,
    /// The plane the curve lies in.
    pub plane: Plane,
}

/// One crossing between the queried curve and a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Parameter on the queried curve.
    pub t_self: f64,
    /// Parameter on the candidate curve.
    pub t_other: f64,
    /// The candidate that was crossed.
    pub other: PlanarCurveId,
}

/// A closed loop in plane coordinates.
///
/// Outer boundaries run counter-clockwise, holes clockwise. The first
/// point is not repeated at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2>,
}

impl Contour {
    /// Creates a contour from a loop of points.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Returns the loop vertices.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Signed enclosed area; positive for counter-clockwise loops.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }
}

/// A filled face: an outer boundary and the holes cut out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Outer boundary.
    pub outer: Contour,
    /// Holes inside the outer boundary.
    pub holes: Vec<Contour>,
}

impl Region {
    /// Filled area: outer area minus the hole areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| h.signed_area().abs()).sum();
        self.outer.signed_area().abs() - holes
    }
}

/// Black-box geometric kernel consumed by the arrangement.
pub trait GeometryOracle {
    /// Projects a 3D curve onto the plane it lies in, using `hint` to pick a
    /// frame when the curve alone does not fix one (a straight line).
    ///
    /// Returns `Ok(None)` when the curve is not planar.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel fails.
    fn project_to_plane(&self, curve: &Curve3d, hint: &Plane) -> Result<Option<Projection>>;

    /// Every crossing between `curve` and the candidates, in no particular
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel fails.
    fn intersect_all(
        &self,
        curve: &Curve2d,
        candidates: &[(PlanarCurveId, &Curve2d)],
    ) -> Result<Vec<Intersection>>;

    /// The piece of `curve` between `start` and `stop`.
    ///
    /// For closed curves a `stop` at or before `start` wraps through the
    /// seam; `start == stop` yields the full loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the piece is degenerate.
    fn trim(&self, curve: &Curve2d, start: f64, stop: f64) -> Result<Curve2d>;

    /// Outer boundaries of the connected components formed by `curves`.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel fails.
    fn build_outer_contours(&self, curves: &[&Curve2d]) -> Result<Vec<Contour>>;

    /// Groups contours into regions with holes.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel fails.
    fn fill_regions(&self, contours: Vec<Contour>) -> Result<Vec<Region>>;
}
