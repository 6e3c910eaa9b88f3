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

//! Slice 1: room assignment only. No panels, no lecturer reasoning.

use super::index::build_index;
use super::model::{self, Dims, VarSet};
use super::result::{self, SolveResult};
use super::{driver, objective, SolveError};
use crate::Config;
use good_lp::{Constraint, Expression, ProblemVariables};
use log::{info, warn};
use std::collections::BTreeMap;

pub(super) fn solve(cfg: &Config) -> Result<SolveResult, SolveError> {
    let idx = build_index(cfg)?;
    let dims = Dims::of(cfg);
    if dims.is_trivial() {
        return Ok(SolveResult::empty_schedule(Some(0)));
    }
    info!(
        "slice1: {} project(s), {} timeslot(s), {} room(s)",
        dims.projects, dims.slots, dims.rooms
    );

    let mut vars = ProblemVariables::new();
    let vs = VarSet::assignment_only(&mut vars, &dims);
    let mut constraints: Vec<Constraint> = Vec::new();
    model::schedule_each_project_once(&vs, &dims, &mut constraints);
    model::one_project_per_room_slot(&vs, &dims, &mut constraints);
    model::block_student_unavailability(cfg, &idx, &vs, &dims, &mut constraints)?;
    let last_t = objective::compactness_var(&mut vars, &vs, &dims, &mut constraints);

    let outcome = driver::run(
        cfg,
        vars,
        &vs,
        Expression::from(last_t),
        constraints,
        &cfg.constraints.solver,
        false,
    )?;
    if !outcome.status.is_feasible() {
        warn!("slice1: no feasible schedule ({})", outcome.status);
        return Ok(SolveResult::no_schedule(outcome.status, 1));
    }

    let span = result::latest_slot_index(&outcome.entries, &idx);
    let mut stats = BTreeMap::new();
    stats.insert("wall_time_s".to_string(), outcome.wall_time_s.into());
    // the backend exposes no conflict count; the key stays for exporter compatibility
    stats.insert("num_conflicts".to_string(), 0.into());
    Ok(SolveResult {
        status: outcome.status,
        objective_value: Some(span),
        entries: outcome.entries,
        diagnostics: Vec::new(),
        stats,
    })
}
