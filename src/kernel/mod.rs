//! Reference planar kernel.
//!
//! A [`GeometryOracle`] over segments, circular arcs and polylines, built on
//! the crate's own 2D math. Region building tessellates curves and traces
//! the faces of the resulting line graph.

mod contours;
mod intersect;
mod project;
#[cfg(test)]
pub(crate) mod testing;
mod trim;

use tracing::trace;

use crate::config::NetworkConfig;
use crate::error::{OracleError, Result};
use crate::geometry::{Curve2d, Curve3d, Plane};
use crate::oracle::{Contour, GeometryOracle, Intersection, Projection, Region};
use crate::registry::PlanarCurveId;

/// Geometry oracle for lines, arcs and polylines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarKernel {
    config: NetworkConfig,
}

impl PlanarKernel {
    /// Creates a kernel using the plane and tessellation tolerances of
    /// `config`.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self { config }
    }
}

impl GeometryOracle for PlanarKernel {
    fn project_to_plane(&self, curve: &Curve3d, hint: &Plane) -> Result<Option<Projection>> {
        project::project(curve, hint, self.config.plane_tolerance())
            .map_err(|err| OracleError::Projection(err.to_string()).into())
    }

    fn intersect_all(
        &self,
        curve: &Curve2d,
        candidates: &[(PlanarCurveId, &Curve2d)],
    ) -> Result<Vec<Intersection>> {
        let hits = intersect::intersect_all(curve, candidates);
        trace!(candidates = candidates.len(), hits = hits.len(), "intersect");
        Ok(hits)
    }

    fn trim(&self, curve: &Curve2d, start: f64, stop: f64) -> Result<Curve2d> {
        trim::trim(curve, start, stop)
    }

    fn build_outer_contours(&self, curves: &[&Curve2d]) -> Result<Vec<Contour>> {
        let contours = contours::outer_contours(curves, self.config.tessellation_tolerance());
        trace!(curves = curves.len(), contours = contours.len(), "outer contours");
        Ok(contours)
    }

    fn fill_regions(&self, contours: Vec<Contour>) -> Result<Vec<Region>> {
        if let Some(short) = contours.iter().find(|c| c.points().len() < 3) {
            return Err(OracleError::Failed(format!(
                "contour with {} points cannot bound a region",
                short.points().len()
            ))
            .into());
        }
        Ok(contours::fill_regions(contours))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SketchError;
    use crate::geometry::Line;
    use crate::math::{Point2, Point3};

    #[test]
    fn degenerate_contour_is_an_oracle_failure() {
        let kernel = PlanarKernel::default();
        let sliver = Contour::new(vec![Point2::origin(), Point2::new(1.0, 0.0)]);
        assert!(matches!(
            kernel.fill_regions(vec![sliver]),
            Err(SketchError::Oracle(OracleError::Failed(_)))
        ));
    }

    #[test]
    fn flat_line_lands_on_hint_plane() {
        let kernel = PlanarKernel::default();
        let line = Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0)).unwrap();
        let projection = kernel
            .project_to_plane(&line.into(), &Plane::world_xy())
            .unwrap()
            .unwrap();
        assert!(projection.plane.is_coincident(&Plane::world_xy(), 1e-9));
    }
}
