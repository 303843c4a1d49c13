use crate::geometry::Curve2d;
use crate::math::intersect_2d::{
    arc_arc_intersect_2d, segment_arc_intersect_2d, segment_segment_intersect_2d, ArcSpan,
    Crossing,
};
use crate::math::Point2;
use crate::oracle::Intersection;
use crate::registry::PlanarCurveId;

/// Two hits closer than this on both curves are the same hit.
const DUPLICATE_TOLERANCE: f64 = 1e-9;

/// A primitive of a curve together with the map from its unit parameter
/// back to the curve parameter: `t = offset + scale * unit`.
#[derive(Debug, Clone, Copy)]
pub(super) struct Piece {
    pub(super) shape: Shape,
    offset: f64,
    scale: f64,
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Shape {
    Segment(Point2, Point2),
    Arc(ArcSpan),
}

impl Piece {
    fn param(&self, unit: f64) -> f64 {
        self.offset + self.scale * unit
    }
}

/// Splits a curve into segments and arcs.
pub(super) fn pieces(curve: &Curve2d) -> Vec<Piece> {
    match curve {
        Curve2d::Segment { start, end } => vec![Piece {
            shape: Shape::Segment(*start, *end),
            offset: 0.0,
            scale: 1.0,
        }],
        Curve2d::Arc {
            center,
            radius,
            start_angle,
            sweep,
        } => vec![Piece {
            shape: Shape::Arc(ArcSpan::new(*center, *radius, *start_angle, *sweep)),
            offset: *start_angle,
            scale: *sweep,
        }],
        Curve2d::Polyline { points, closed } => {
            let n = points.len();
            let count = if *closed { n } else { n - 1 };
            (0..count)
                .map(|i| Piece {
                    shape: Shape::Segment(points[i], points[(i + 1) % n]),
                    #[allow(clippy::cast_precision_loss)]
                    offset: i as f64,
                    scale: 1.0,
                })
                .collect()
        }
    }
}

fn crossings(a: &Shape, b: &Shape) -> Vec<Crossing> {
    match (a, b) {
        (Shape::Segment(a0, a1), Shape::Segment(b0, b1)) => {
            segment_segment_intersect_2d(a0, a1, b0, b1).into_iter().collect()
        }
        (Shape::Segment(a0, a1), Shape::Arc(arc)) => segment_arc_intersect_2d(a0, a1, arc),
        (Shape::Arc(arc), Shape::Segment(b0, b1)) => segment_arc_intersect_2d(b0, b1, arc)
            .into_iter()
            .map(|c| Crossing {
                point: c.point,
                t: c.u,
                u: c.t,
            })
            .collect(),
        (Shape::Arc(first), Shape::Arc(second)) => arc_arc_intersect_2d(first, second),
    }
}

/// Folds the end of a closed curve's range onto its start.
fn fold_seam(curve: &Curve2d, t: f64) -> f64 {
    let kind = curve.kind();
    if kind.is_closed() && (t - kind.t_max()).abs() < DUPLICATE_TOLERANCE {
        kind.t_min()
    } else {
        t
    }
}

/// Every crossing between `curve` and each candidate.
///
/// Hits shared by adjacent pieces (a polyline vertex, a closed seam) are
/// reported once.
pub(super) fn intersect_all(
    curve: &Curve2d,
    candidates: &[(PlanarCurveId, &Curve2d)],
) -> Vec<Intersection> {
    let own = pieces(curve);
    let mut hits: Vec<Intersection> = Vec::new();
    for (other, candidate) in candidates {
        let theirs = pieces(candidate);
        for a in &own {
            for b in &theirs {
                for crossing in crossings(&a.shape, &b.shape) {
                    let hit = Intersection {
                        t_self: fold_seam(curve, a.param(crossing.t)),
                        t_other: fold_seam(candidate, b.param(crossing.u)),
                        other: *other,
                    };
                    let duplicate = hits.iter().any(|h| {
                        h.other == hit.other
                            && (h.t_self - hit.t_self).abs() < DUPLICATE_TOLERANCE
                            && (h.t_other - hit.t_other).abs() < DUPLICATE_TOLERANCE
                    });
                    if !duplicate {
                        hits.push(hit);
                    }
                }
            }
        }
    }
    hits
}
