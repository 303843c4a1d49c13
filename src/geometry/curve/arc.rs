use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A circular arc in 3D space.
///
/// Defined by a center, radius, normal axis, and a reference direction
/// for the zero-angle. The parametric form sweeps from `start_angle`
/// to `end_angle` (in radians) around the normal axis.
#[derive(Debug, Clone)]
pub struct Arc {
    center: Point3,
    radius: f64,
    normal: Vector3,
    ref_dir: Vector3,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    /// Creates a new arc.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the arc circle
    /// * `radius` - Radius (must be positive)
    /// * `normal` - Normal vector defining the arc plane
    /// * `ref_dir` - Reference direction for angle = 0 (must be perpendicular to normal)
    /// * `start_angle` - Start angle in radians
    /// * `end_angle` - End angle in radians
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the normal is zero-length,
    /// or the reference direction is not perpendicular to the normal.
    pub fn new(
        center: Point3,
        radius: f64,
        normal: Vector3,
        ref_dir: Vector3,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }

        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / normal_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if end_angle <= start_angle {
            return Err(GeometryError::Degenerate("arc must sweep counter-clockwise".into()).into());
        }
        if end_angle - start_angle > std::f64::consts::TAU + TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "end_angle",
                value: end_angle,
                min: start_angle,
                max: start_angle + std::f64::consts::TAU,
            }
            .into());
        }

        if normal.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to normal".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            normal,
            ref_dir,
            start_angle,
            end_angle,
        })
    }

    /// Creates a full circle with an automatically chosen reference direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the normal is zero-length.
    pub fn circle(center: Point3, radius: f64, normal: Vector3) -> Result<Self> {
        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let unit = normal / normal_len;
        let reference = if unit.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let ref_dir = unit.cross(&reference).cross(&unit);
        Self::new(center, radius, unit, ref_dir, 0.0, std::f64::consts::TAU)
    }

    /// Returns the center of the arc.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius of the arc.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the normal vector of the arc plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns the zero-angle reference direction.
    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        &self.ref_dir
    }

    /// Returns the start angle in radians.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Returns the end angle in radians.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Angular extent, `end_angle - start_angle`.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Computes the second axis direction (perpendicular to both normal and `ref_dir`).
    #[must_use]
    pub fn binormal(&self) -> Vector3 {
        self.normal.cross(&self.ref_dir)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, TAU};

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn circle_sweeps_a_full_turn() {
        let circle = Arc::circle(Point3::new(1.0, 0.0, 2.0), 0.5, Vector3::new(0.0, 1.0, 1.0)).unwrap();
        assert_abs_diff_eq!(circle.sweep(), TAU, epsilon = 1e-12);
        assert_abs_diff_eq!(circle.ref_dir().dot(circle.normal()), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(circle.ref_dir().norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn binormal_completes_a_right_handed_frame() {
        let arc = Arc::new(
            Point3::origin(),
            2.0,
            Vector3::z() * 3.0,
            Vector3::x(),
            0.0,
            FRAC_PI_2,
        )
        .unwrap();
        let binormal = arc.binormal();
        assert_abs_diff_eq!(binormal.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.normal().z, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.sweep(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn tilted_reference_direction_fails() {
        let result = Arc::new(
            Point3::origin(),
            1.0,
            Vector3::z(),
            Vector3::new(1.0, 0.0, 1.0),
            0.0,
            1.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn clockwise_sweep_fails() {
        let result = Arc::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x(), 1.0, 0.5);
        assert!(result.is_err());
    }

    #[test]
    fn zero_radius_fails() {
        assert!(Arc::circle(Point3::origin(), 0.0, Vector3::z()).is_err());
    }
}
