// Copyright 2026 by the fypsched developers
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except in compliance with
// the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! Decision variables and hard constraints of the assessment model.
//!
//! Three families of binary variables describe a schedule:
//!
//! * `x[p,t,r]` - project `p` takes place at timeslot `t` in room `r`
//! * `y[p,l]` - lecturer `l` sits on the panel of project `p`
//! * `z[p,l,t,r]` - `x[p,t,r] AND y[p,l]`, i.e. lecturer `l` is physically present
//!   at `(t,r)`
//!
//! `z` is what makes per-lecturer, per-slot reasoning linear: availability, double
//! booking and daily caps are all sums over `z`.

use super::index::IdIndex;
use super::SolveError;
use crate::Config;
use chrono::NaiveDate;
use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use itertools::iproduct;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Model dimensions, all taken from the configuration.
#[derive(Debug, Clone, Copy)]
pub(super) struct Dims {
    pub projects: usize,
    pub slots: usize,
    pub rooms: usize,
    pub lecturers: usize,
}

impl Dims {
    pub fn of(cfg: &Config) -> Dims {
        Dims {
            projects: cfg.projects.len(),
            slots: cfg.timeslots.len(),
            rooms: cfg.constraints.rooms as usize,
            lecturers: cfg.lecturers.len(),
        }
    }

    /// Nothing to schedule. The slices return a trivial optimum without declaring
    /// a single variable in this case.
    pub fn is_trivial(&self) -> bool {
        self.projects == 0 || self.slots == 0
    }
}

/// The decision variables of one solve.
///
/// The maps are keyed by dense index tuples and iterated in key order, so identical
/// configurations produce identical models across runs. Variable names follow the same
/// scheme (`x_p0_t1_r0`), which keeps single-threaded debugging reproducible.
pub(super) struct VarSet {
    pub x: BTreeMap<(usize, usize, usize), Variable>,
    pub y: BTreeMap<(usize, usize), Variable>,
    pub z: BTreeMap<(usize, usize, usize, usize), Variable>,
}

impl VarSet {
    /// Declare the assignment grid `x` only (slice 1).
    pub fn assignment_only(vars: &mut ProblemVariables, dims: &Dims) -> VarSet {
        let mut x = BTreeMap::new();
        for (p, t, r) in iproduct!(0..dims.projects, 0..dims.slots, 0..dims.rooms) {
            let v = vars.add(
                variable()
                    .binary()
                    .name(format!("x_p{}_t{}_r{}", p, t, r)),
            );
            x.insert((p, t, r), v);
        }
        VarSet {
            x,
            y: BTreeMap::new(),
            z: BTreeMap::new(),
        }
    }

    /// Declare `x`, `y` and `z` (slices 2 and 3).
    pub fn with_panels(vars: &mut ProblemVariables, dims: &Dims) -> VarSet {
        let mut vs = VarSet::assignment_only(vars, dims);
        for (p, l) in iproduct!(0..dims.projects, 0..dims.lecturers) {
            let v = vars.add(variable().binary().name(format!("y_p{}_l{}", p, l)));
            vs.y.insert((p, l), v);
        }
        for (p, l, t, r) in iproduct!(
            0..dims.projects,
            0..dims.lecturers,
            0..dims.slots,
            0..dims.rooms
        ) {
            let v = vars.add(
                variable()
                    .binary()
                    .name(format!("z_p{}_l{}_t{}_r{}", p, l, t, r)),
            );
            vs.z.insert((p, l, t, r), v);
        }
        vs
    }
}

/// Every project is scheduled exactly once.
pub(super) fn schedule_each_project_once(vs: &VarSet, dims: &Dims, out: &mut Vec<Constraint>) {
    for p in 0..dims.projects {
        let scheduled: Expression = iproduct!(0..dims.slots, 0..dims.rooms)
            .map(|(t, r)| vs.x[&(p, t, r)])
            .sum();
        out.push(constraint!(scheduled == 1));
    }
}

/// At most one project per (timeslot, room) pair.
pub(super) fn one_project_per_room_slot(vs: &VarSet, dims: &Dims, out: &mut Vec<Constraint>) {
    for (t, r) in iproduct!(0..dims.slots, 0..dims.rooms) {
        let occupied: Expression = (0..dims.projects).map(|p| vs.x[&(p, t, r)]).sum();
        out.push(constraint!(occupied <= 1));
    }
}

/// Block out every slot in which one of the project's students is unavailable.
pub(super) fn block_student_unavailability(
    cfg: &Config,
    idx: &IdIndex,
    vs: &VarSet,
    dims: &Dims,
    out: &mut Vec<Constraint>,
) -> Result<(), SolveError> {
    for (p, project) in cfg.projects.iter().enumerate() {
        let mut blocked = BTreeSet::new();
        for sid in &project.student_ids {
            let s = *idx
                .student_id_to_idx
                .get(sid)
                .ok_or_else(|| SolveError::UnknownId {
                    kind: "student",
                    id: sid.clone(),
                })?;
            for slot_id in &cfg.students[s].unavailable_slot_ids {
                let t = *idx
                    .slot_id_to_idx
                    .get(slot_id)
                    .ok_or_else(|| SolveError::UnknownId {
                        kind: "timeslot",
                        id: slot_id.clone(),
                    })?;
                blocked.insert(t);
            }
        }
        for &t in &blocked {
            for r in 0..dims.rooms {
                let xv = vs.x[&(p, t, r)];
                out.push(constraint!(xv == 0));
            }
        }
    }
    Ok(())
}

/// Every panel has exactly `panel_size` members.
pub(super) fn fill_panels(vs: &VarSet, dims: &Dims, panel_size: u32, out: &mut Vec<Constraint>) {
    for p in 0..dims.projects {
        let members: Expression = (0..dims.lecturers).map(|l| vs.y[&(p, l)]).sum();
        out.push(constraint!(members == panel_size as f64));
    }
}

/// Linearise `z = x AND y` with the standard three inequalities.
pub(super) fn link_presence(vs: &VarSet, dims: &Dims, out: &mut Vec<Constraint>) {
    for (p, l, t, r) in iproduct!(
        0..dims.projects,
        0..dims.lecturers,
        0..dims.slots,
        0..dims.rooms
    ) {
        let zv = vs.z[&(p, l, t, r)];
        let xv = vs.x[&(p, t, r)];
        let yv = vs.y[&(p, l)];
        out.push(constraint!(zv <= xv));
        out.push(constraint!(zv <= yv));
        out.push(constraint!(zv >= xv + yv - 1));
    }
}

/// The supervisor sits on the panel of their own project.
pub(super) fn require_supervisor_on_panel(
    cfg: &Config,
    idx: &IdIndex,
    vs: &VarSet,
    out: &mut Vec<Constraint>,
) -> Result<(), SolveError> {
    if !cfg.constraints.must_include_supervisor {
        return Ok(());
    }
    for (p, project) in cfg.projects.iter().enumerate() {
        if let Some(sup) = &project.supervisor_lecturer_id {
            let l = *idx
                .lecturer_id_to_idx
                .get(sup)
                .ok_or_else(|| SolveError::UnknownId {
                    kind: "lecturer",
                    id: sup.clone(),
                })?;
            let yv = vs.y[&(p, l)];
            out.push(constraint!(yv == 1));
        }
    }
    Ok(())
}

/// A lecturer cannot be present at a slot outside their availability.
pub(super) fn block_lecturer_unavailability(
    cfg: &Config,
    vs: &VarSet,
    dims: &Dims,
    out: &mut Vec<Constraint>,
) {
    for (l, lecturer) in cfg.lecturers.iter().enumerate() {
        let available: HashSet<&str> = lecturer
            .available_slot_ids
            .iter()
            .map(String::as_str)
            .collect();
        for (t, slot) in cfg.timeslots.iter().enumerate() {
            if available.contains(slot.id.as_str()) {
                continue;
            }
            for (p, r) in iproduct!(0..dims.projects, 0..dims.rooms) {
                let zv = vs.z[&(p, l, t, r)];
                out.push(constraint!(zv == 0));
            }
        }
    }
}

/// No lecturer can be in two rooms at the same time.
pub(super) fn forbid_double_booking(vs: &VarSet, dims: &Dims, out: &mut Vec<Constraint>) {
    for (l, t) in iproduct!(0..dims.lecturers, 0..dims.slots) {
        let present: Expression = iproduct!(0..dims.projects, 0..dims.rooms)
            .map(|(p, r)| vs.z[&(p, l, t, r)])
            .sum();
        out.push(constraint!(present <= 1));
    }
}

/// Per-lecturer daily assessment caps.
// TODO: enforce max_total here as well once its cap semantics are settled
pub(super) fn cap_daily_load(cfg: &Config, vs: &VarSet, dims: &Dims, out: &mut Vec<Constraint>) {
    let mut slots_by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (t, slot) in cfg.timeslots.iter().enumerate() {
        slots_by_date.entry(slot.date).or_default().push(t);
    }
    for (l, lecturer) in cfg.lecturers.iter().enumerate() {
        let cap = match lecturer.max_per_day {
            Some(m) => m,
            None => continue,
        };
        for day_slots in slots_by_date.values() {
            let load: Expression = iproduct!(
                0..dims.projects,
                day_slots.iter().copied(),
                0..dims.rooms
            )
            .map(|(p, t, r)| vs.z[&(p, l, t, r)])
            .sum();
            out.push(constraint!(load <= cap as f64));
        }
    }
}
