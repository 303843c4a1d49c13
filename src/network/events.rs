use crate::scene::CurveHandle;

/// A change to the user curves, as signalled by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveEvent {
    /// A curve was inserted into the scene.
    Added(CurveHandle),
    /// A curve was deleted from the scene.
    Removed(CurveHandle),
    /// A curve was swapped for another one.
    Replaced { from: CurveHandle, to: CurveHandle },
    /// A curve was hidden; it leaves the arrangement.
    Hidden(CurveHandle),
    /// A hidden curve was shown again; it rejoins the arrangement.
    Unhidden(CurveHandle),
}
