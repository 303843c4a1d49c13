use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace, warn};

use crate::error::{ContractError, Result};
use crate::geometry::{Curve2d, CurveKind, Plane};
use crate::oracle::GeometryOracle;
use crate::registry::{Joint, PlanarCurve, PlanarCurveId, PlaneId, PointOnCurve};
use crate::scene::{Agent, CurveHandle, FragmentView, SceneDatabase, WHOLE_CURVE};

use super::Engine;

/// A cut point on the curve being split.
#[derive(Debug, Clone, Copy)]
struct Cut {
    t: f64,
    /// Index into the coplanar members, `None` for a polyline corner.
    other: Option<usize>,
    t_other: f64,
}

/// One fragment to publish.
#[derive(Debug)]
struct Piece {
    start: f64,
    stop: f64,
    curve: Curve2d,
}

#[derive(Debug, Clone, Copy)]
enum End {
    Start,
    Stop,
}

/// Everything an add will change, computed before anything is changed.
#[derive(Debug, Default)]
struct Plan {
    recuts: Vec<(CurveHandle, Vec<Piece>)>,
    touches: Vec<(CurveHandle, CurveHandle)>,
    joints: Vec<(CurveHandle, End, Joint)>,
}

impl<O, S> Engine<'_, O, S>
where
    O: GeometryOracle + ?Sized,
    S: SceneDatabase + ?Sized,
{
    /// Integrates a curve into its plane's arrangement, splitting it and
    /// every curve it reaches through crossings.
    ///
    /// Returns the plane the curve was placed on, or `None` when the curve
    /// cannot be projected onto a plane (nothing changes in that case).
    ///
    /// # Errors
    ///
    /// Returns an error if the curve is not in the scene, or the oracle
    /// reports an intersection outside a curve's domain or with an unknown
    /// curve. No curve bookkeeping changes on error; a curve that was
    /// already registered keeps its fragments.
    pub fn add(&mut self, handle: CurveHandle) -> Result<Option<PlaneId>> {
        let curve = self
            .scene
            .curve(handle)
            .ok_or(ContractError::UnknownCurve(handle))?;

        // Step 1: project and normalize
        let projection = match self.oracle.project_to_plane(curve, &Plane::world_xy()) {
            Ok(Some(projection)) => projection,
            Ok(None) => {
                warn!(?handle, "curve is not planar, skipped");
                return Ok(None);
            }
            Err(err) => {
                warn!(?handle, %err, "projection failed, skipped");
                return Ok(None);
            }
        };
        let mut planar = projection.curve;
        let plane_id = self.registry.normalize_plane(&mut planar, &projection.plane);
        let plane = self
            .registry
            .plane(plane_id)
            .cloned()
            .ok_or(ContractError::UnknownPlane)?;
        let planar = PlanarCurve {
            id: self.registry.allocate_id(),
            curve: planar,
        };

        // Step 2: resolve every oracle query
        let plan = self.plan(handle, &planar, plane_id)?;

        // Step 3: apply
        if self.retire(handle).is_some() {
            debug!(?handle, "re-added a registered curve");
        }
        self.registry.register(handle, planar, plane_id);
        for &(a, b) in &plan.touches {
            self.registry.touch(a, b);
        }
        for (owner, end, joint) in plan.joints {
            if let Some(info) = self.registry.lookup_mut(owner) {
                match end {
                    End::Start => info.joints.start = Some(joint),
                    End::Stop => info.joints.stop = Some(joint),
                }
            }
        }
        let recut = plan.recuts.len();
        for (owner, pieces) in plan.recuts {
            self.replace_fragments(owner, &plane, pieces);
        }
        debug!(?handle, recut, "curve added");
        Ok(Some(plane_id))
    }

    /// Breadth-first walk from the new curve over everything it crosses.
    fn plan(&self, handle: CurveHandle, planar: &PlanarCurve, plane: PlaneId) -> Result<Plan> {
        let mut members: Vec<(CurveHandle, &PlanarCurve)> = self.registry.on_plane(plane);
        members.retain(|(h, _)| *h != handle);
        members.push((handle, planar));
        let index: HashMap<PlanarCurveId, usize> = members
            .iter()
            .enumerate()
            .map(|(i, (_, pc))| (pc.id, i))
            .collect();

        let mut plan = Plan::default();
        let seed = members.len() - 1;
        let mut queue = VecDeque::from([seed]);
        let mut visited = HashSet::from([seed]);

        while let Some(i) = queue.pop_front() {
            let (current, current_planar) = members[i];
            let curve = &current_planar.curve;
            let kind = curve.kind();

            let candidates: Vec<(PlanarCurveId, &Curve2d)> = members
                .iter()
                .filter(|(h, _)| *h != current)
                .map(|(_, pc)| (pc.id, &pc.curve))
                .collect();
            let hits = self.oracle.intersect_all(curve, &candidates)?;

            let mut cuts = Vec::with_capacity(hits.len());
            for hit in hits {
                let j = *index
                    .get(&hit.other)
                    .ok_or(ContractError::UnknownPlanarCurve(hit.other.get()))?;
                self.check_domain(hit.t_self, kind)?;
                self.check_domain(hit.t_other, members[j].1.curve.kind())?;
                cuts.push(Cut {
                    t: hit.t_self,
                    other: Some(j),
                    t_other: hit.t_other,
                });
            }
            cuts.extend(curve.corner_params().into_iter().map(|t| Cut {
                t,
                other: None,
                t_other: t,
            }));

            if cuts.is_empty() {
                plan.recuts.push((
                    current,
                    vec![Piece {
                        start: WHOLE_CURVE,
                        stop: WHOLE_CURVE,
                        curve: curve.clone(),
                    }],
                ));
                continue;
            }
            cuts.sort_by(|a, b| a.t.total_cmp(&b.t));

            for cut in &cuts {
                let Some(j) = cut.other else { continue };
                let (other, other_planar) = members[j];
                plan.touches.push((current, other));
                if !kind.is_closed() {
                    collect_joints(&mut plan, current, kind, other, other_planar, cut);
                }
                if visited.insert(j) {
                    queue.push_back(j);
                }
            }

            let pieces = self.split(curve, kind, &cuts)?;
            trace!(curve = ?current, cuts = cuts.len(), fragments = pieces.len(), "split");
            plan.recuts.push((current, pieces));
        }
        Ok(plan)
    }

    /// Trims `curve` between consecutive cuts.
    ///
    /// Open curves are bounded by their domain ends; closed curves wrap from
    /// the last cut to the first one period later.
    fn split(&self, curve: &Curve2d, kind: CurveKind, cuts: &[Cut]) -> Result<Vec<Piece>> {
        let mut bounds: Vec<f64> = Vec::with_capacity(cuts.len() + 2);
        match kind {
            CurveKind::Open { t_min, t_max } => {
                bounds.push(t_min);
                bounds.extend(cuts.iter().map(|c| c.t));
                bounds.push(t_max);
            }
            CurveKind::Closed { .. } => {
                bounds.extend(cuts.iter().map(|c| c.t));
                bounds.push(cuts[0].t + kind.period());
            }
        }

        let mut pieces = Vec::with_capacity(bounds.len());
        for pair in bounds.windows(2) {
            let (start, stop) = (pair[0], pair[1]);
            if (stop - start).abs() < self.config.param_tolerance() {
                continue;
            }
            let stop = if kind.is_closed() && stop > kind.t_max() {
                stop - kind.period()
            } else {
                stop
            };
            let trimmed = self.oracle.trim(curve, start, stop)?;
            pieces.push(Piece {
                start,
                stop,
                curve: trimmed,
            });
        }
        Ok(pieces)
    }

    fn check_domain(&self, t: f64, kind: CurveKind) -> Result<()> {
        if kind.contains(t, self.config.param_tolerance()) {
            Ok(())
        } else {
            Err(ContractError::ParameterOutsideDomain {
                t,
                t_min: kind.t_min(),
                t_max: kind.t_max(),
            }
            .into())
        }
    }

    /// Replaces a curve's published fragments wholesale.
    fn replace_fragments(&mut self, owner: CurveHandle, plane: &Plane, pieces: Vec<Piece>) {
        let Some(info) = self.registry.lookup_mut(owner) else {
            return;
        };
        for stale in info.fragments.drain(..) {
            self.scene.remove_fragment(stale, Agent::Automatic);
        }
        for piece in pieces {
            let view = FragmentView {
                parent: owner,
                start: piece.start,
                stop: piece.stop,
                plane: plane.clone(),
                curve: piece.curve,
            };
            info.fragments
                .push(self.scene.add_fragment(view, Agent::Automatic));
        }
    }
}

/// Records joints for a cut landing exactly on an end of the open curve
/// `current`, and on the other curve when the cut is one of its ends too.
#[allow(clippy::float_cmp)]
fn collect_joints(
    plan: &mut Plan,
    current: CurveHandle,
    kind: CurveKind,
    other: CurveHandle,
    other_planar: &PlanarCurve,
    cut: &Cut,
) {
    let end = if cut.t == kind.t_min() {
        End::Start
    } else if cut.t == kind.t_max() {
        End::Stop
    } else {
        return;
    };
    let other_kind = other_planar.curve.kind();
    let on1 = PointOnCurve {
        curve: current,
        t: cut.t,
        t_min: kind.t_min(),
        t_max: kind.t_max(),
    };
    let on2 = PointOnCurve {
        curve: other,
        t: cut.t_other,
        t_min: other_kind.t_min(),
        t_max: other_kind.t_max(),
    };
    plan.joints.push((current, end, Joint { on1, on2 }));

    let other_end = if cut.t_other == other_kind.t_min() {
        Some(End::Start)
    } else if cut.t_other == other_kind.t_max() {
        Some(End::Stop)
    } else {
        None
    };
    if let Some(other_end) = other_end {
        plan.joints.push((other, other_end, Joint { on1: on2, on2: on1 }));
    }
}
