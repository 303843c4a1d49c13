use crate::error::{GeometryError, Result};
use crate::math::{Matrix3, Point2, Point3, Vector3, TOLERANCE};

/// Colinearity window for plane normals (on `1 - |n1 · n2|`).
const NORMAL_TOLERANCE: f64 = 1e-9;

/// An infinite plane in 3D space with an in-plane coordinate frame.
///
/// Defined by an origin point and two orthonormal direction vectors
/// (`u_dir`, `v_dir`). The normal is `u_dir × v_dir`. Planar curves are
/// expressed in `(u, v)` coordinates of their plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a new plane from an origin and two direction vectors.
    ///
    /// `v_dir` is re-orthogonalized against `u_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vectors are zero-length
    /// or parallel (degenerate plane).
    pub fn new(origin: Point3, u_dir: Vector3, v_dir: Vector3) -> Result<Self> {
        let u_len = u_dir.norm();
        if u_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        if v_dir.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let u_dir = u_dir / u_len;

        let normal = u_dir.cross(&v_dir);
        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("plane directions are parallel".into()).into(),
            );
        }
        let normal = normal / normal_len;
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        };

        let u_dir = normal.cross(&reference).normalize();
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// The world XY plane through the origin.
    #[must_use]
    pub fn world_xy() -> Self {
        Self {
            origin: Point3::origin(),
            u_dir: Vector3::x(),
            v_dir: Vector3::y(),
            normal: Vector3::z(),
        }
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the normal vector of the plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns the same frame moved along its normal so that it passes
    /// through `point`.
    #[must_use]
    pub fn through(&self, point: &Point3) -> Self {
        let offset = self.signed_distance(point);
        Self {
            origin: self.origin + self.normal * offset,
            ..self.clone()
        }
    }

    /// Signed distance of `point` from the plane along its normal.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&(point - self.origin))
    }

    /// Expresses a world point in `(u, v)` plane coordinates.
    #[must_use]
    pub fn to_local(&self, point: &Point3) -> Point2 {
        let diff = point - self.origin;
        Point2::new(diff.dot(&self.u_dir), diff.dot(&self.v_dir))
    }

    /// Maps `(u, v)` plane coordinates back to a world point.
    #[must_use]
    pub fn to_world(&self, point: &Point2) -> Point3 {
        self.origin + self.u_dir * point.x + self.v_dir * point.y
    }

    /// Whether two planes are geometrically the same plane.
    ///
    /// Normals must be colinear (either sense) and the origins must not be
    /// offset along the normal by more than `tolerance`.
    #[must_use]
    pub fn is_coincident(&self, other: &Plane, tolerance: f64) -> bool {
        let colinear = 1.0 - self.normal.dot(&other.normal).abs() < NORMAL_TOLERANCE;
        colinear && self.signed_distance(&other.origin).abs() < tolerance
    }

    /// Homogeneous 2D transform taking `(u, v)` coordinates of this plane to
    /// `(u, v)` coordinates of `target`.
    ///
    /// The linear part is orthonormal; it is a reflection when the two
    /// normals point in opposite directions.
    #[must_use]
    pub fn transform_to(&self, target: &Plane) -> Matrix3 {
        let offset = self.origin - target.origin;
        Matrix3::new(
            self.u_dir.dot(&target.u_dir),
            self.v_dir.dot(&target.u_dir),
            offset.dot(&target.u_dir),
            self.u_dir.dot(&target.v_dir),
            self.v_dir.dot(&target.v_dir),
            offset.dot(&target.v_dir),
            0.0,
            0.0,
            1.0,
        )
    }
}
