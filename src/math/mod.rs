pub mod arc_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3x3 matrix, used as a homogeneous 2D transform between plane frames.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Snaps a unit parameter to exactly `0.0` or `1.0` when it is within
/// `eps` of either end.
#[must_use]
pub fn snap_unit(t: f64, eps: f64) -> f64 {
    if t.abs() < eps {
        0.0
    } else if (t - 1.0).abs() < eps {
        1.0
    } else {
        t
    }
}
