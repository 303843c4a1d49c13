use std::collections::{BTreeSet, HashMap, HashSet};

use crate::geometry::Curve2d;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::polygon_2d::{point_in_polygon_2d, rotate_to_canonical_start, signed_area_2d};
use crate::math::Point2;
use crate::oracle::{Contour, Region};

/// Vertices closer than this are merged.
const SNAP: f64 = 1e-7;

/// Faces with less area than this are slivers and are dropped.
const MIN_FACE_AREA: f64 = 1e-9;

/// A planar straight-line graph: no two edges cross except at vertices.
#[derive(Debug, Default)]
struct Graph {
    vertices: Vec<Point2>,
    adjacency: Vec<BTreeSet<usize>>,
}

impl Graph {
    fn vertex(&mut self, point: Point2) -> usize {
        if let Some(i) = self
            .vertices
            .iter()
            .position(|v| (v - point).norm() < SNAP)
        {
            return i;
        }
        self.vertices.push(point);
        self.adjacency.push(BTreeSet::new());
        self.vertices.len() - 1
    }

    fn connect(&mut self, a: usize, b: usize) {
        if a != b {
            self.adjacency[a].insert(b);
            self.adjacency[b].insert(a);
        }
    }

    /// Repeatedly removes vertices of degree one.
    fn prune_dangling(&mut self) {
        let mut stack: Vec<usize> = (0..self.vertices.len())
            .filter(|&v| self.adjacency[v].len() == 1)
            .collect();
        while let Some(v) = stack.pop() {
            let Some(&w) = self.adjacency[v].iter().next() else {
                continue;
            };
            self.adjacency[v].clear();
            self.adjacency[w].remove(&v);
            if self.adjacency[w].len() == 1 {
                stack.push(w);
            }
        }
    }
}

/// Breaks every curve into chords and splits the chords at their mutual
/// crossings.
fn planarize(curves: &[&Curve2d], tolerance: f64) -> Graph {
    let chords: Vec<(Point2, Point2)> = curves
        .iter()
        .flat_map(|curve| {
            let chain = curve.tessellate(tolerance);
            chain.windows(2).map(|w| (w[0], w[1])).collect::<Vec<_>>()
        })
        .filter(|(a, b)| (b - a).norm() >= SNAP)
        .collect();

    let mut splits: Vec<Vec<(f64, Point2)>> = chords
        .iter()
        .map(|(a, b)| vec![(0.0, *a), (1.0, *b)])
        .collect();
    for i in 0..chords.len() {
        for j in i + 1..chords.len() {
            let (a0, a1) = &chords[i];
            let (b0, b1) = &chords[j];
            if !boxes_overlap(a0, a1, b0, b1) {
                continue;
            }
            if let Some(crossing) = segment_segment_intersect_2d(a0, a1, b0, b1) {
                splits[i].push((crossing.t, crossing.point));
                splits[j].push((crossing.u, crossing.point));
            }
        }
    }

    let mut graph = Graph::default();
    for mut cuts in splits {
        cuts.sort_by(|x, y| x.0.total_cmp(&y.0));
        let ids: Vec<usize> = cuts.iter().map(|(_, p)| graph.vertex(*p)).collect();
        for pair in ids.windows(2) {
            graph.connect(pair[0], pair[1]);
        }
    }
    graph
}

fn boxes_overlap(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    a0.x.min(a1.x) <= b0.x.max(b1.x) + SNAP
        && b0.x.min(b1.x) <= a0.x.max(a1.x) + SNAP
        && a0.y.min(a1.y) <= b0.y.max(b1.y) + SNAP
        && b0.y.min(b1.y) <= a0.y.max(a1.y) + SNAP
}

/// Walks every face of the graph, keeping the clockwise ones.
///
/// With outgoing edges sorted by angle, the successor of `a -> b` is the
/// edge leaving `b` just before `b -> a` in counter-clockwise order. Bounded
/// faces come out counter-clockwise; the unbounded face of each connected
/// component comes out clockwise and is its outer boundary.
fn trace_outer_faces(graph: &Graph) -> Vec<Contour> {
    let sorted: Vec<Vec<usize>> = graph
        .adjacency
        .iter()
        .enumerate()
        .map(|(v, neighbours)| {
            let origin = graph.vertices[v];
            let mut list: Vec<usize> = neighbours.iter().copied().collect();
            list.sort_by(|&p, &q| {
                let dp = graph.vertices[p] - origin;
                let dq = graph.vertices[q] - origin;
                dp.y.atan2(dp.x).total_cmp(&dq.y.atan2(dq.x))
            });
            list
        })
        .collect();
    let mut position: HashMap<(usize, usize), usize> = HashMap::new();
    for (v, list) in sorted.iter().enumerate() {
        for (i, &w) in list.iter().enumerate() {
            position.insert((v, w), i);
        }
    }

    let mut used: HashSet<(usize, usize)> = HashSet::new();
    let mut contours = Vec::new();
    for (u, list) in sorted.iter().enumerate() {
        for &v in list {
            if used.contains(&(u, v)) {
                continue;
            }
            let mut cycle = Vec::new();
            let (mut a, mut b) = (u, v);
            loop {
                used.insert((a, b));
                cycle.push(graph.vertices[a]);
                let around = &sorted[b];
                let Some(&back) = position.get(&(b, a)) else {
                    break;
                };
                let next = around[(back + around.len() - 1) % around.len()];
                (a, b) = (b, next);
                if (a, b) == (u, v) || used.contains(&(a, b)) {
                    break;
                }
            }
            if signed_area_2d(&cycle) < -MIN_FACE_AREA {
                cycle.reverse();
                contours.push(Contour::new(rotate_to_canonical_start(&cycle)));
            }
        }
    }
    contours
}

/// Outer boundaries of the connected components formed by `curves`.
pub(super) fn outer_contours(curves: &[&Curve2d], tolerance: f64) -> Vec<Contour> {
    let mut graph = planarize(curves, tolerance);
    graph.prune_dangling();
    trace_outer_faces(&graph)
}

/// Nests contours by containment: even depth starts a region, odd depth is
/// a hole of its innermost container.
pub(super) fn fill_regions(contours: Vec<Contour>) -> Vec<Region> {
    let areas: Vec<f64> = contours.iter().map(|c| c.signed_area().abs()).collect();
    let containers: Vec<Vec<usize>> = contours
        .iter()
        .enumerate()
        .map(|(i, inner)| {
            let sample = inner.points()[0];
            contours
                .iter()
                .enumerate()
                .filter(|&(j, outer)| {
                    j != i && areas[j] > areas[i] && point_in_polygon_2d(&sample, outer.points())
                })
                .map(|(j, _)| j)
                .collect()
        })
        .collect();

    let mut regions = Vec::new();
    let mut region_of: HashMap<usize, usize> = HashMap::new();
    for (i, contour) in contours.iter().enumerate() {
        if containers[i].len() % 2 == 0 {
            region_of.insert(i, regions.len());
            regions.push(Region {
                outer: contour.clone(),
                holes: Vec::new(),
            });
        }
    }
    for (i, contour) in contours.into_iter().enumerate() {
        if containers[i].len() % 2 == 0 {
            continue;
        }
        let parent = containers[i]
            .iter()
            .copied()
            .min_by(|&p, &q| areas[p].total_cmp(&areas[q]));
        if let Some(index) = parent.and_then(|p| region_of.get(&p)) {
            let mut hole = contour.points().to_vec();
            hole.reverse();
            regions[*index].holes.push(Contour::new(hole));
        }
    }
    regions
}
