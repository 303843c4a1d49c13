use tracing::debug;

use crate::error::{ContractError, Result};
use crate::oracle::GeometryOracle;
use crate::registry::{CurveRegistry, PlaneId};
use crate::scene::{Agent, RegionHandle, RegionView, SceneDatabase};

/// Regenerates the filled regions of one plane.
///
/// Every region previously published on a coincident plane is withdrawn and
/// replaced by regions built from the curves currently on `plane`. The new
/// regions are computed before the old ones are withdrawn, so an oracle
/// failure leaves the published regions untouched.
///
/// Returns the number of regions published.
///
/// # Errors
///
/// Returns an error if the plane is not registered or the oracle fails.
pub fn rebuild<O, S>(
    oracle: &O,
    scene: &mut S,
    registry: &CurveRegistry,
    plane: PlaneId,
    plane_tolerance: f64,
) -> Result<usize>
where
    O: GeometryOracle + ?Sized,
    S: SceneDatabase + ?Sized,
{
    let target = registry
        .plane(plane)
        .cloned()
        .ok_or(ContractError::UnknownPlane)?;

    let curves = registry.find_with_same_plane(plane);
    let contours = oracle.build_outer_contours(&curves)?;
    let regions = oracle.fill_regions(contours)?;

    let stale: Vec<RegionHandle> = scene
        .regions()
        .into_iter()
        .filter(|(_, view)| view.plane.is_coincident(&target, plane_tolerance))
        .map(|(handle, _)| handle)
        .collect();
    for handle in &stale {
        scene.remove_region(*handle, Agent::Automatic);
    }

    let count = regions.len();
    for region in regions {
        let view = RegionView {
            plane: target.clone(),
            region,
        };
        scene.add_region(view, Agent::Automatic);
    }
    debug!(
        curves = curves.len(),
        removed = stale.len(),
        regions = count,
        "regions rebuilt"
    );
    Ok(count)
}
