use crate::error::{GeometryError, Result};
use crate::geometry::Curve2d;
use crate::math::{Point2, TOLERANCE};

/// The piece of `curve` between `start` and `stop`.
///
/// Closed curves wrap through the seam when `stop <= start`.
pub(super) fn trim(curve: &Curve2d, start: f64, stop: f64) -> Result<Curve2d> {
    let kind = curve.kind();
    let stop = if kind.is_closed() && stop <= start {
        stop + kind.period()
    } else {
        stop
    };
    if stop - start < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "trim range [{start}, {stop}] is empty"
        ))
        .into());
    }

    match curve {
        Curve2d::Segment { .. } => Curve2d::segment(curve.point_at(start), curve.point_at(stop)),
        Curve2d::Arc { center, radius, .. } => Curve2d::arc(*center, *radius, start, stop - start),
        Curve2d::Polyline { .. } => {
            let mut points = vec![curve.point_at(start)];
            let first = start.floor() + 1.0;
            let mut vertex = first;
            while vertex < stop {
                push_distinct(&mut points, curve.point_at(vertex));
                vertex += 1.0;
            }
            push_distinct(&mut points, curve.point_at(stop));
            if points.len() == 2 {
                Curve2d::segment(points[0], points[1])
            } else {
                Curve2d::polyline(points, false)
            }
        }
    }
}

fn push_distinct(points: &mut Vec<Point2>, point: Point2) {
    if points.last().is_none_or(|last| (point - last).norm() >= TOLERANCE) {
        points.push(point);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{PI, TAU};

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::CurveKind;

    fn square() -> Curve2d {
        Curve2d::polyline(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            true,
        )
        .unwrap()
    }

    #[test]
    fn segment_middle() {
        let seg = Curve2d::segment(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)).unwrap();
        let piece = trim(&seg, 0.25, 0.5).unwrap();
        assert_eq!(
            piece,
            Curve2d::Segment {
                start: Point2::new(1.0, 0.0),
                end: Point2::new(2.0, 0.0)
            }
        );
    }

    #[test]
    fn circle_wraps_through_seam() {
        let circle = Curve2d::circle(Point2::origin(), 1.0).unwrap();
        let piece = trim(&circle, 3.0 * PI / 2.0, PI / 2.0).unwrap();
        let kind = piece.kind();
        assert!(matches!(kind, CurveKind::Open { .. }));
        assert_abs_diff_eq!(kind.t_min(), 3.0 * PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(kind.period(), PI, epsilon = 1e-12);
    }

    #[test]
    fn circle_equal_bounds_is_full_loop() {
        let circle = Curve2d::circle(Point2::origin(), 1.0).unwrap();
        let piece = trim(&circle, 1.0, 1.0).unwrap();
        assert!(piece.is_closed());
        assert_abs_diff_eq!(piece.kind().period(), TAU, epsilon = 1e-12);
    }

    #[test]
    fn polyline_edge_becomes_segment() {
        let piece = trim(&square(), 1.0, 2.0).unwrap();
        assert_eq!(
            piece,
            Curve2d::Segment {
                start: Point2::new(1.0, 0.0),
                end: Point2::new(1.0, 1.0)
            }
        );
    }

    #[test]
    fn polyline_wrap_keeps_seam_vertex() {
        let piece = trim(&square(), 3.5, 0.5).unwrap();
        match piece {
            Curve2d::Polyline { points, closed } => {
                assert!(!closed);
                assert_eq!(points.len(), 3);
                assert_abs_diff_eq!(points[1].x, 0.0, epsilon = 1e-12);
                assert_abs_diff_eq!(points[1].y, 0.0, epsilon = 1e-12);
            }
            other => panic!("expected polyline, got {other:?}"),
        }
    }

    #[test]
    fn empty_range_fails() {
        let seg = Curve2d::segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).unwrap();
        assert!(trim(&seg, 0.5, 0.5).is_err());
    }
}
