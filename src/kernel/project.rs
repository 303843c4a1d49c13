use crate::error::Result;
use crate::geometry::{Arc, Curve2d, Curve3d, Line, Plane, Polyline};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};
use crate::oracle::Projection;

/// Window on `|d · n|` inside which a direction counts as lying in a plane.
const PARALLEL_TOLERANCE: f64 = 1e-9;

/// Flattens a 3D curve onto the plane it lies in.
///
/// `Ok(None)` means the curve does not lie in any plane within
/// `plane_tolerance`.
pub(super) fn project(
    curve: &Curve3d,
    hint: &Plane,
    plane_tolerance: f64,
) -> Result<Option<Projection>> {
    match curve {
        Curve3d::Line(line) => project_line(line, hint).map(Some),
        Curve3d::Arc(arc) => project_arc(arc).map(Some),
        Curve3d::Polyline(polyline) => project_polyline(polyline, hint, plane_tolerance),
    }
}

/// Plane containing the direction `d` through `origin`, preferring `hint`.
///
/// A direction parallel to the hint keeps the hint frame, moved through
/// `origin`. Otherwise the plane holds `d` and is as close to the hint
/// normal as possible.
fn plane_containing(origin: &Point3, d: &Vector3, hint: &Plane) -> Result<Plane> {
    let dir = d.normalize();
    if dir.dot(hint.normal()).abs() < PARALLEL_TOLERANCE {
        return Ok(hint.through(origin));
    }
    let side = dir.cross(hint.normal());
    if side.norm() < TOLERANCE {
        // Perpendicular to the hint plane.
        return Plane::new(*origin, dir, *hint.u_dir());
    }
    Plane::from_normal(*origin, side.cross(&dir))
}

fn project_line(line: &Line, hint: &Plane) -> Result<Projection> {
    let plane = plane_containing(line.start(), &line.direction(), hint)?;
    let curve = Curve2d::segment(plane.to_local(line.start()), plane.to_local(line.end()))?;
    Ok(Projection { curve, plane })
}

fn project_arc(arc: &Arc) -> Result<Projection> {
    let plane = Plane::new(*arc.center(), *arc.ref_dir(), arc.binormal())?;
    let curve = Curve2d::arc(Point2::origin(), arc.radius(), arc.start_angle(), arc.sweep())?;
    Ok(Projection { curve, plane })
}

fn project_polyline(
    polyline: &Polyline,
    hint: &Plane,
    plane_tolerance: f64,
) -> Result<Option<Projection>> {
    let points = polyline.points();
    let origin = points[0];
    let normal = newell_normal(points);

    let plane = if normal.norm() < TOLERANCE {
        // Collinear vertices: any plane through the chord works.
        let chord = points[points.len() - 1] - origin;
        plane_containing(&origin, &chord, hint)?
    } else if 1.0 - normal.normalize().dot(hint.normal()).abs() < PARALLEL_TOLERANCE {
        hint.through(&origin)
    } else {
        Plane::from_normal(origin, normal)?
    };

    if points
        .iter()
        .any(|p| plane.signed_distance(p).abs() > plane_tolerance)
    {
        return Ok(None);
    }

    let local = points.iter().map(|p| plane.to_local(p)).collect();
    let curve = Curve2d::polyline(local, polyline.is_closed())?;
    Ok(Some(Projection { curve, plane }))
}

/// Newell's method; robust for non-convex loops. Zero for collinear input.
fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn line_in_xy_keeps_hint_frame() {
        let line = Line::new(Point3::new(0.0, 0.0, 2.0), Point3::new(1.0, 1.0, 2.0)).unwrap();
        let projection = project(&line.into(), &Plane::world_xy(), 1e-3)
            .unwrap()
            .unwrap();
        assert_abs_diff_eq!(projection.plane.normal().z, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(projection.plane.origin().z, 2.0, epsilon = 1e-12);
        match projection.curve {
            Curve2d::Segment { start, end } => {
                assert_abs_diff_eq!(start.x, 0.0, epsilon = 1e-12);
                assert_abs_diff_eq!(end.y, 1.0, epsilon = 1e-12);
            }
            other => panic!("expected segment, got {other:?}"),
        }
    }

    #[test]
    fn vertical_line_gets_a_plane_containing_it() {
        let line = Line::new(Point3::origin(), Point3::new(0.0, 0.0, 3.0)).unwrap();
        let projection = project(&line.into(), &Plane::world_xy(), 1e-3)
            .unwrap()
            .unwrap();
        assert_abs_diff_eq!(projection.plane.normal().z, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            projection.plane.signed_distance(&Point3::new(0.0, 0.0, 3.0)),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn arc_round_trips_through_its_plane() {
        let arc = Arc::circle(Point3::new(1.0, 2.0, 3.0), 0.5, Vector3::new(0.0, 1.0, 1.0)).unwrap();
        let world = *arc.center()
            + *arc.ref_dir() * (0.5 * 1.0_f64.cos())
            + arc.binormal() * (0.5 * 1.0_f64.sin());
        let projection = project(&arc.into(), &Plane::world_xy(), 1e-3)
            .unwrap()
            .unwrap();
        let local = projection.curve.point_at(1.0);
        let back = projection.plane.to_world(&local);
        assert_abs_diff_eq!((back - world).norm(), 0.0, epsilon = 1e-12);
        assert!(projection.curve.is_closed());
    }

    #[test]
    fn non_planar_polyline_is_rejected() {
        let polyline = Polyline::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 1.0),
            ],
            false,
        )
        .unwrap();
        assert!(project(&polyline.into(), &Plane::world_xy(), 1e-3)
            .unwrap()
            .is_none());
    }

    #[test]
    fn planar_polyline_in_xy_uses_hint_frame() {
        let polyline = Polyline::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
            ],
            true,
        )
        .unwrap();
        let projection = project(&polyline.into(), &Plane::world_xy(), 1e-3)
            .unwrap()
            .unwrap();
        assert!(projection.plane.is_coincident(&Plane::world_xy(), 1e-3));
        assert!(projection.curve.is_closed());
    }
}
