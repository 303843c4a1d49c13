use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};

/// A 3D polyline through a sequence of vertices.
///
/// Once projected, vertex `i` sits at parameter `t = i`. A closed polyline
/// has an implicit segment from the last vertex back to the first.
#[derive(Debug, Clone)]
pub struct Polyline {
    points: Vec<Point3>,
    closed: bool,
}

impl Polyline {
    /// Creates a new polyline.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two vertices (three for a
    /// closed polyline) or two consecutive vertices coincide.
    pub fn new(points: Vec<Point3>, closed: bool) -> Result<Self> {
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
        for i in 0..segments {
            if (points[(i + 1) % n] - points[i]).norm() < TOLERANCE {
                return Err(GeometryError::Degenerate(format!(
                    "polyline vertices {i} and {} coincide",
                    (i + 1) % n
                ))
                .into());
            }
        }
        Ok(Self { points, closed })
    }

    /// Returns the vertices.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Whether the last vertex connects back to the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
