use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{arc_subdivision_count, point_on_circle, sample_arc};
use crate::math::{Matrix3, Point2, Vector3, TOLERANCE};

/// Sweep window inside which an arc counts as a full circle.
const FULL_TURN_TOLERANCE: f64 = 1e-9;

/// Parameter range of a planar curve, tagged by whether it is periodic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveKind {
    /// Bounded curve with two distinct endpoints.
    Open { t_min: f64, t_max: f64 },
    /// Periodic curve; the period is `t_max - t_min`.
    Closed { t_min: f64, t_max: f64 },
}

impl CurveKind {
    /// Start of the parameter range.
    #[must_use]
    pub fn t_min(&self) -> f64 {
        match *self {
            CurveKind::Open { t_min, .. } | CurveKind::Closed { t_min, .. } => t_min,
        }
    }

    /// End of the parameter range.
    #[must_use]
    pub fn t_max(&self) -> f64 {
        match *self {
            CurveKind::Open { t_max, .. } | CurveKind::Closed { t_max, .. } => t_max,
        }
    }

    /// Length of the parameter range.
    #[must_use]
    pub fn period(&self) -> f64 {
        self.t_max() - self.t_min()
    }

    /// Whether the curve is periodic.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, CurveKind::Closed { .. })
    }

    /// Whether `t` lies in the range, widened by `tolerance`.
    #[must_use]
    pub fn contains(&self, t: f64, tolerance: f64) -> bool {
        t >= self.t_min() - tolerance && t <= self.t_max() + tolerance
    }
}

/// A curve expressed in the `(u, v)` coordinates of a plane.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve2d {
    /// Straight segment, `t ∈ [0, 1]`.
    Segment { start: Point2, end: Point2 },
    /// Counter-clockwise circular arc; `t` is the absolute angle in
    /// `[start_angle, start_angle + sweep]`.
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
    /// Polyline, `t ∈ [0, segment_count]` with vertex `i` at `t = i`.
    Polyline { points: Vec<Point2>, closed: bool },
}

impl Curve2d {
    /// Creates a straight segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints coincide.
    pub fn segment(start: Point2, end: Point2) -> Result<Self> {
        if (end - start).norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Curve2d::Segment { start, end })
    }

    /// Creates a counter-clockwise arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or the sweep is not
    /// in `(0, 2π]`.
    pub fn arc(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if sweep < TOLERANCE || sweep > TAU + FULL_TURN_TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "sweep",
                value: sweep,
                min: 0.0,
                max: TAU,
            }
            .into());
        }
        Ok(Curve2d::Arc {
            center,
            radius,
            start_angle,
            sweep: sweep.min(TAU),
        })
    }

    /// Creates a full circle starting at angle zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive.
    pub fn circle(center: Point2, radius: f64) -> Result<Self> {
        Self::arc(center, radius, 0.0, TAU)
    }

    /// Creates a polyline.
    ///
    /// # Errors
    ///
    /// Returns an error if there are too few vertices or two consecutive
    /// vertices coincide.
    pub fn polyline(points: Vec<Point2>, closed: bool) -> Result<Self> {
        let min = if closed { 3 } else { 2 };
        if points.len() < min {
            return Err(GeometryError::Degenerate(format!(
                "polyline needs at least {min} vertices, got {}",
                points.len()
            ))
            .into());
        }
        let n = points.len();
        let segments = if closed { n } else { n - 1 };
        if (0..segments).any(|i| (points[(i + 1) % n] - points[i]).norm() < TOLERANCE) {
            return Err(GeometryError::Degenerate("polyline has repeated vertices".into()).into());
        }
        Ok(Curve2d::Polyline { points, closed })
    }

    /// Returns the parameter range and periodicity.
    #[must_use]
    pub fn kind(&self) -> CurveKind {
        match self {
            Curve2d::Segment { .. } => CurveKind::Open {
                t_min: 0.0,
                t_max: 1.0,
            },
            Curve2d::Arc {
                start_angle, sweep, ..
            } => {
                let (t_min, t_max) = (*start_angle, start_angle + sweep);
                if (sweep - TAU).abs() < FULL_TURN_TOLERANCE {
                    CurveKind::Closed { t_min, t_max }
                } else {
                    CurveKind::Open { t_min, t_max }
                }
            }
            Curve2d::Polyline { points, closed } => {
                let segments = if *closed {
                    points.len()
                } else {
                    points.len() - 1
                };
                #[allow(clippy::cast_precision_loss)]
                let t_max = segments as f64;
                if *closed {
                    CurveKind::Closed { t_min: 0.0, t_max }
                } else {
                    CurveKind::Open { t_min: 0.0, t_max }
                }
            }
        }
    }

    /// Whether the curve is periodic.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.kind().is_closed()
    }

    /// Evaluates the curve at `t`. Closed curves accept any `t` and wrap.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self {
            Curve2d::Segment { start, end } => start + (end - start) * t,
            Curve2d::Arc { center, radius, .. } => point_on_circle(center, *radius, t),
            Curve2d::Polyline { points, closed } => {
                let kind = self.kind();
                let t = if *closed {
                    (t - kind.t_min()).rem_euclid(kind.period())
                } else {
                    t.clamp(kind.t_min(), kind.t_max())
                };
                let n = points.len();
                let last = if *closed { n - 1 } else { n - 2 };
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let i = (t.floor() as usize).min(last);
                #[allow(clippy::cast_precision_loss)]
                let local = t - i as f64;
                let a = points[i];
                let b = points[(i + 1) % n];
                a + (b - a) * local
            }
        }
    }

    /// Parameters of the vertices where a polyline changes direction.
    ///
    /// Open polylines report their interior vertices; closed polylines
    /// report every vertex, the seam at `t = 0` included. Smooth curves have
    /// no corners.
    #[must_use]
    pub fn corner_params(&self) -> Vec<f64> {
        match self {
            Curve2d::Polyline { points, closed } => {
                let range = if *closed {
                    0..points.len()
                } else {
                    1..points.len() - 1
                };
                #[allow(clippy::cast_precision_loss)]
                range.map(|i| i as f64).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Applies a rigid homogeneous 2D transform.
    ///
    /// A reflection reverses the traversal of an arc, so its start angle is
    /// recomputed to keep the sweep counter-clockwise.
    #[must_use]
    pub fn transformed(&self, m: &Matrix3) -> Self {
        let map = |p: &Point2| {
            let h = m * Vector3::new(p.x, p.y, 1.0);
            Point2::new(h.x, h.y)
        };
        match self {
            Curve2d::Segment { start, end } => Curve2d::Segment {
                start: map(start),
                end: map(end),
            },
            Curve2d::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let phi = m[(1, 0)].atan2(m[(0, 0)]);
                let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
                let start = if det >= 0.0 {
                    start_angle + phi
                } else {
                    phi - start_angle - sweep
                };
                Curve2d::Arc {
                    center: map(center),
                    radius: *radius,
                    start_angle: start.rem_euclid(TAU),
                    sweep: *sweep,
                }
            }
            Curve2d::Polyline { points, closed } => Curve2d::Polyline {
                points: points.iter().map(map).collect(),
                closed: *closed,
            },
        }
    }

    /// Approximates the curve by a chain of points within `tolerance`.
    ///
    /// Closed curves repeat their first point at the end.
    #[must_use]
    pub fn tessellate(&self, tolerance: f64) -> Vec<Point2> {
        match self {
            Curve2d::Segment { start, end } => vec![*start, *end],
            Curve2d::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let n = arc_subdivision_count(*radius, *sweep, tolerance).max(3);
                let mut points = sample_arc(center, *radius, *start_angle, *sweep, n);
                if self.is_closed() {
                    let first = points[0];
                    if let Some(last) = points.last_mut() {
                        *last = first;
                    }
                }
                points
            }
            Curve2d::Polyline { points, closed } => {
                let mut chain = points.clone();
                if *closed {
                    chain.push(points[0]);
                }
                chain
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn circle_is_closed() {
        let circle = Curve2d::circle(Point2::origin(), 1.0).unwrap();
        let kind = circle.kind();
        assert!(kind.is_closed());
        assert_abs_diff_eq!(kind.period(), TAU, epsilon = 1e-12);
    }

    #[test]
    fn partial_arc_is_open() {
        let arc = Curve2d::arc(Point2::origin(), 1.0, 0.0, PI).unwrap();
        assert!(!arc.is_closed());
        let end = arc.point_at(PI);
        assert_abs_diff_eq!(end.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn polyline_domain_and_corners() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ];
        let open = Curve2d::polyline(points.clone(), false).unwrap();
        assert_eq!(open.kind(), CurveKind::Open { t_min: 0.0, t_max: 2.0 });
        assert_eq!(open.corner_params(), vec![1.0]);

        let closed = Curve2d::polyline(points, true).unwrap();
        assert_eq!(closed.kind(), CurveKind::Closed { t_min: 0.0, t_max: 3.0 });
        assert_eq!(closed.corner_params(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn closed_polyline_point_wraps() {
        let closed = Curve2d::polyline(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            true,
        )
        .unwrap();
        let p = closed.point_at(4.5);
        assert_abs_diff_eq!(p.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_constructors() {
        assert!(Curve2d::segment(Point2::origin(), Point2::origin()).is_err());
        assert!(Curve2d::arc(Point2::origin(), 1.0, 0.0, -1.0).is_err());
        assert!(Curve2d::polyline(vec![Point2::origin(), Point2::new(1.0, 0.0)], true).is_err());
    }

    #[test]
    fn rotation_shifts_arc_start() {
        let arc = Curve2d::arc(Point2::new(1.0, 0.0), 1.0, 0.0, FRAC_PI_2).unwrap();
        let rotate = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let moved = arc.transformed(&rotate);
        match moved {
            Curve2d::Arc {
                center,
                start_angle,
                sweep,
                ..
            } => {
                assert_abs_diff_eq!(center.y, 1.0, epsilon = 1e-12);
                assert_abs_diff_eq!(start_angle, FRAC_PI_2, epsilon = 1e-12);
                assert_abs_diff_eq!(sweep, FRAC_PI_2, epsilon = 1e-12);
            }
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn reflection_keeps_arc_points() {
        let arc = Curve2d::arc(Point2::origin(), 2.0, 0.2, 1.0).unwrap();
        let mirror = Matrix3::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0);
        let mirrored = arc.transformed(&mirror);
        let kind = mirrored.kind();
        let a = mirrored.point_at(kind.t_min());
        let b = mirrored.point_at(kind.t_max());
        // Ends swap under a reflection.
        let orig_end = arc.point_at(1.2);
        assert_abs_diff_eq!(a.x, orig_end.x, epsilon = 1e-12);
        assert_abs_diff_eq!(a.y, -orig_end.y, epsilon = 1e-12);
        let orig_start = arc.point_at(0.2);
        assert_abs_diff_eq!(b.x, orig_start.x, epsilon = 1e-12);
        assert_abs_diff_eq!(b.y, -orig_start.y, epsilon = 1e-12);
    }

    #[test]
    fn tessellated_circle_closes_exactly() {
        let circle = Curve2d::circle(Point2::new(2.0, 3.0), 1.0).unwrap();
        let points = circle.tessellate(1e-3);
        assert!(points.len() > 10);
        assert_eq!(points.first(), points.last());
    }
}
