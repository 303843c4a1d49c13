use crate::error::Result;
use crate::geometry::{Curve2d, Curve3d, Plane};
use crate::oracle::{Contour, GeometryOracle, Intersection, Projection, Region};
use crate::registry::PlanarCurveId;

use super::PlanarKernel;

/// How [`CorruptKernel`] tampers with intersection results.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Corruption {
    /// Every hit lands far outside the queried curve's domain.
    ParameterOutsideDomain,
    /// Every hit names a planar curve that was never allocated.
    UnknownCurve,
}

/// Reference kernel whose intersection answers are inconsistent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CorruptKernel {
    inner: PlanarKernel,
    corruption: Corruption,
}

impl CorruptKernel {
    pub(crate) const BAD_PARAMETER: f64 = 99.0;
    pub(crate) const BAD_ID: u64 = u64::MAX;

    pub(crate) fn new(corruption: Corruption) -> Self {
        Self {
            inner: PlanarKernel::default(),
            corruption,
        }
    }
}

impl GeometryOracle for CorruptKernel {
    fn project_to_plane(&self, curve: &Curve3d, hint: &Plane) -> Result<Option<Projection>> {
        self.inner.project_to_plane(curve, hint)
    }

    fn intersect_all(
        &self,
        curve: &Curve2d,
        candidates: &[(PlanarCurveId, &Curve2d)],
    ) -> Result<Vec<Intersection>> {
        let hits = self.inner.intersect_all(curve, candidates)?;
        Ok(hits
            .into_iter()
            .map(|hit| match self.corruption {
                Corruption::ParameterOutsideDomain => Intersection {
                    t_self: Self::BAD_PARAMETER,
                    ..hit
                },
                Corruption::UnknownCurve => Intersection {
                    other: PlanarCurveId::new(Self::BAD_ID),
                    ..hit
                },
            })
            .collect())
    }

    fn trim(&self, curve: &Curve2d, start: f64, stop: f64) -> Result<Curve2d> {
        self.inner.trim(curve, start, stop)
    }

    fn build_outer_contours(&self, curves: &[&Curve2d]) -> Result<Vec<Contour>> {
        self.inner.build_outer_contours(curves)
    }

    fn fill_regions(&self, contours: Vec<Contour>) -> Result<Vec<Region>> {
        self.inner.fill_regions(contours)
    }
}
