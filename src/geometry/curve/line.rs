use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A bounded line segment.
///
/// The parametric form is: `P(t) = start + t * (end - start)`, `t ∈ [0, 1]`.
#[derive(Debug, Clone)]
pub struct Line {
    start: Point3,
    end: Point3,
}

impl Line {
    /// Creates a new line segment between two points.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment has zero length.
    pub fn new(start: Point3, end: Point3) -> Result<Self> {
        if (end - start).norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self { start, end })
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &Point3 {
        &self.end
    }

    /// Returns the (non-normalized) direction `end - start`.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        self.end - self.start
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn direction_spans_the_segment() {
        let line = Line::new(Point3::new(1.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0)).unwrap();
        let direction = line.direction();
        assert!((direction.x - 2.0).abs() < TOLERANCE);
        assert!((direction.y - 4.0).abs() < TOLERANCE);
        assert!(((line.start() + direction) - line.end()).norm() < TOLERANCE);
    }

    #[test]
    fn zero_length_fails() {
        assert!(Line::new(Point3::origin(), Point3::origin()).is_err());
    }
}
