use std::f64::consts::TAU;

use super::{snap_unit, Point2, Vector2, TOLERANCE};

/// Endpoint snapping window for unit parameters.
const SNAP: f64 = 1e-9;

/// A counter-clockwise circular arc in the plane.
///
/// Points are `center + radius * (cos a, sin a)` for `a` in
/// `[start_angle, start_angle + sweep]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl ArcSpan {
    /// Creates a new arc span.
    #[must_use]
    pub fn new(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    /// Converts a unit parameter `[0, 1]` to an absolute angle.
    #[must_use]
    pub fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + self.sweep * t
    }
}

/// A single crossing between two primitives.
///
/// `t` and `u` are unit parameters on the first and second primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub point: Point2,
    pub t: f64,
    pub u: f64,
}

/// Bounded segment-segment intersection.
///
/// Endpoints are included; parameters within a tiny window of an endpoint
/// are snapped to exactly `0.0` or `1.0`. Parallel segments never intersect.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<Crossing> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.perp(&db);
    if cross.abs() < TOLERANCE {
        return None;
    }

    let d = b0 - a0;
    let t = d.perp(&db) / cross;
    let u = d.perp(&da) / cross;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = snap_unit(t.clamp(0.0, 1.0), SNAP);
        let u = snap_unit(u.clamp(0.0, 1.0), SNAP);
        Some(Crossing {
            point: a0 + da * t,
            t,
            u,
        })
    } else {
        None
    }
}

/// Intersection of a line segment with a circular arc.
///
/// Returns crossings where `t` is the parameter on the segment and `u` the
/// unit parameter on the arc.
#[must_use]
pub fn segment_arc_intersect_2d(a0: &Point2, a1: &Point2, arc: &ArcSpan) -> Vec<Crossing> {
    let mut results = Vec::new();
    if arc.radius < TOLERANCE || arc.sweep.abs() < TOLERANCE {
        return results;
    }

    let d = a1 - a0;
    let seg_len_sq = d.norm_squared();
    if seg_len_sq < TOLERANCE * TOLERANCE {
        return results;
    }

    // Substitute the parametric segment into the circle equation:
    // |a0 + t*d - c|² = r²
    let f = a0 - arc.center;
    let a = seg_len_sq;
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - arc.radius * arc.radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < -TOLERANCE {
        return results;
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();

    let eps = TOLERANCE;
    let roots = if disc_sqrt < TOLERANCE * 100.0 {
        // Tangent case: single root.
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    };

    for t in roots {
        if t < -eps || t > 1.0 + eps {
            continue;
        }
        let t = snap_unit(t.clamp(0.0, 1.0), SNAP);
        let point = a0 + d * t;

        let rel = point - arc.center;
        if let Some(u) = angle_to_arc_param(rel.y.atan2(rel.x), arc) {
            results.push(Crossing { point, t, u });
        }
    }

    results
}

/// Intersection of two circular arcs.
///
/// Returns crossings where `t` and `u` are unit parameters on `first` and
/// `second`. Concentric arcs never intersect.
#[must_use]
pub fn arc_arc_intersect_2d(first: &ArcSpan, second: &ArcSpan) -> Vec<Crossing> {
    let mut results = Vec::new();
    let (r1, r2) = (first.radius, second.radius);
    if r1 < TOLERANCE || r2 < TOLERANCE {
        return results;
    }

    let delta: Vector2 = second.center - first.center;
    let dist_sq = delta.norm_squared();
    let dist = dist_sq.sqrt();

    if dist < TOLERANCE {
        return results;
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if dist > sum + TOLERANCE || dist < diff - TOLERANCE {
        return results;
    }

    // Distance from the first center along the center line to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h_sq = r1 * r1 - a * a;
    if h_sq < -TOLERANCE {
        return results;
    }
    let h = h_sq.max(0.0).sqrt();

    let along = delta / dist;
    let mid = first.center + along * a;
    let perp = Vector2::new(-along.y, along.x);

    let candidates = if h < TOLERANCE {
        vec![mid]
    } else {
        vec![mid + perp * h, mid - perp * h]
    };

    let eps = TOLERANCE * 1e3;
    for point in candidates {
        let rel1 = point - first.center;
        let rel2 = point - second.center;

        let t = angle_to_arc_param(rel1.y.atan2(rel1.x), first);
        let u = angle_to_arc_param(rel2.y.atan2(rel2.x), second);

        if let (Some(t), Some(u)) = (t, u) {
            if (rel1.norm() - r1).abs() < eps && (rel2.norm() - r2).abs() < eps {
                results.push(Crossing { point, t, u });
            }
        }
    }

    results
}

/// Converts an absolute angle to a unit arc parameter in `[0, 1]`.
///
/// Returns `None` if the angle lies outside the arc's angular range.
fn angle_to_arc_param(angle: f64, arc: &ArcSpan) -> Option<f64> {
    let eps = TOLERANCE * 100.0;

    let mut delta = angle - arc.start_angle;
    if arc.sweep > 0.0 {
        while delta < -eps {
            delta += TAU;
        }
        while delta > TAU + eps {
            delta -= TAU;
        }
    } else {
        while delta > eps {
            delta -= TAU;
        }
        while delta < -TAU - eps {
            delta += TAU;
        }
    }

    let t = delta / arc.sweep;
    if t >= -eps && t <= 1.0 + eps {
        Some(snap_unit(t.clamp(0.0, 1.0), SNAP))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn segment_segment_crossing() {
        let hit = segment_segment_intersect_2d(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0))
            .unwrap();
        assert!((hit.point.x - 1.0).abs() < TOLERANCE);
        assert!((hit.point.y - 1.0).abs() < TOLERANCE);
        assert!((hit.t - 0.5).abs() < TOLERANCE);
        assert!((hit.u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn segment_segment_no_crossing() {
        assert!(
            segment_segment_intersect_2d(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0))
                .is_none()
        );
    }

    #[test]
    fn segment_segment_shared_endpoint_is_exact() {
        let hit = segment_segment_intersect_2d(&p(0.0, 0.0), &p(1.0, 1.0), &p(1.0, 1.0), &p(0.0, 1.0))
            .unwrap();
        assert_eq!(hit.t.to_bits(), 1.0_f64.to_bits());
        assert_eq!(hit.u.to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn segment_arc_two_crossings() {
        let arc = ArcSpan::new(p(0.0, 0.0), 1.0, 0.0, PI);
        let hits = segment_arc_intersect_2d(&p(-2.0, 0.5), &p(2.0, 0.5), &arc);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
    }

    #[test]
    fn segment_arc_miss_outside_arc_range() {
        // The circle is crossed at angles 0 and π, neither inside [π/4, π/2].
        let arc = ArcSpan::new(p(0.0, 0.0), 1.0, PI / 4.0, PI / 4.0);
        let hits = segment_arc_intersect_2d(&p(-2.0, 0.0), &p(2.0, 0.0), &arc);
        assert!(hits.is_empty(), "hits={hits:?}");
    }

    #[test]
    fn segment_arc_tangent() {
        let arc = ArcSpan::new(p(0.0, 0.0), 1.0, 0.0, PI);
        let hits = segment_arc_intersect_2d(&p(-1.0, 1.0), &p(1.0, 1.0), &arc);
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!((hits[0].u - 0.5).abs() < 1e-6);
    }

    #[test]
    fn arc_arc_two_full_circles() {
        let first = ArcSpan::new(p(0.0, 0.25), 1.0, 0.0, TAU);
        let second = ArcSpan::new(p(0.0, -0.25), 1.0, 0.0, TAU);
        let hits = arc_arc_intersect_2d(&first, &second);
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        for hit in &hits {
            assert!(hit.point.y.abs() < 1e-9);
            assert!((hit.point.x.abs() - 0.9375_f64.sqrt()).abs() < 1e-9);
        }
    }

    #[test]
    fn arc_arc_far_apart() {
        let first = ArcSpan::new(p(0.0, 0.0), 1.0, 0.0, PI);
        let second = ArcSpan::new(p(5.0, 0.0), 1.0, 0.0, PI);
        assert!(arc_arc_intersect_2d(&first, &second).is_empty());
    }

    #[test]
    fn arc_arc_concentric() {
        let first = ArcSpan::new(p(0.0, 0.0), 1.0, 0.0, TAU);
        let second = ArcSpan::new(p(0.0, 0.0), 2.0, 0.0, TAU);
        assert!(arc_arc_intersect_2d(&first, &second).is_empty());
    }

    #[test]
    fn arc_arc_miss_outside_range() {
        let first = ArcSpan::new(p(0.0, 0.0), 1.0, 0.0, PI / 4.0);
        let second = ArcSpan::new(p(1.0, 0.0), 1.0, PI, PI / 4.0);
        assert!(arc_arc_intersect_2d(&first, &second).is_empty());
    }
}
