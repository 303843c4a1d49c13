pub mod curve;
pub mod curve2d;
pub mod plane;

pub use curve::{Arc, Curve3d, Line, Polyline};
pub use curve2d::{Curve2d, CurveKind};
pub use plane::Plane;
