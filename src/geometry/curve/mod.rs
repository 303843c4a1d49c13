mod arc;
mod line;
mod polyline;

pub use arc::Arc;
pub use line::Line;
pub use polyline::Polyline;

/// A user-owned 3D curve as stored in the scene database.
#[derive(Debug, Clone)]
pub enum Curve3d {
    /// A bounded line segment.
    Line(Line),
    /// A circular arc or full circle.
    Arc(Arc),
    /// A polyline, open or closed.
    Polyline(Polyline),
}

impl From<Line> for Curve3d {
    fn from(line: Line) -> Self {
        Curve3d::Line(line)
    }
}

impl From<Arc> for Curve3d {
    fn from(arc: Arc) -> Self {
        Curve3d::Arc(arc)
    }
}

impl From<Polyline> for Curve3d {
    fn from(polyline: Polyline) -> Self {
        Curve3d::Polyline(polyline)
    }
}
