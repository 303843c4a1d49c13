//! 2D arc evaluation and chord subdivision.

use std::f64::consts::PI;

use super::Point2;

/// Evaluates a point on a circle at an absolute angle.
#[must_use]
pub fn point_on_circle(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Computes the number of chords needed to approximate an arc
/// within the given tolerance.
#[must_use]
pub fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // From the sagitta formula: sagitta = r * (1 - cos(θ/2))
    let max_angle = if tolerance >= radius {
        PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}

/// Samples an arc into `n + 1` points from `start_angle` to
/// `start_angle + sweep`, both ends included.
#[must_use]
pub fn sample_arc(center: &Point2, radius: f64, start_angle: f64, sweep: f64, n: u32) -> Vec<Point2> {
    (0..=n)
        .map(|j| {
            let t = f64::from(j) / f64::from(n);
            point_on_circle(center, radius, start_angle + sweep * t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn point_on_unit_circle() {
        let pt = point_on_circle(&Point2::new(1.0, 1.0), 2.0, PI / 2.0);
        assert_abs_diff_eq!(pt.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pt.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn subdivision_grows_with_precision() {
        let coarse = arc_subdivision_count(1.0, TAU, 1e-2);
        let fine = arc_subdivision_count(1.0, TAU, 1e-4);
        assert!(fine > coarse);
        assert!(coarse >= 3);
    }

    #[test]
    fn subdivision_degenerate_inputs() {
        assert_eq!(arc_subdivision_count(0.0, TAU, 1e-3), 1);
        assert_eq!(arc_subdivision_count(1.0, 0.0, 1e-3), 1);
    }

    #[test]
    fn sample_includes_both_ends() {
        let pts = sample_arc(&Point2::origin(), 1.0, 0.0, PI, 4);
        assert_eq!(pts.len(), 5);
        assert_abs_diff_eq!(pts[0].x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pts[4].x, -1.0, epsilon = 1e-12);
    }
}
