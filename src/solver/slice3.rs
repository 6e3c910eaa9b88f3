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

//! Slice 3: the full model. Same hard constraints as slice 2 plus the weighted soft
//! objectives (schedule compactness, workload balance, lunch avoidance).

use super::index::build_index;
use super::model::{self, Dims, VarSet};
use super::result::{self, SolveResult};
use super::{driver, objective, SolveError};
use crate::Config;
use good_lp::{Constraint, Expression, ProblemVariables};
use log::{debug, info, warn};
use std::collections::BTreeMap;

pub(super) fn solve(cfg: &Config) -> Result<SolveResult, SolveError> {
    let idx = build_index(cfg)?;
    let dims = Dims::of(cfg);
    let weights = cfg.constraints.weights;
    let any_term_active = weights.span > 0 || weights.workload_balance > 0 || weights.lunch > 0;
    if dims.is_trivial() {
        let objective_value = if any_term_active { Some(0) } else { None };
        return Ok(SolveResult::empty_schedule(objective_value));
    }
    info!(
        "slice3: {} project(s), {} timeslot(s), {} room(s), {} lecturer(s), weights span={} workload={} lunch={}",
        dims.projects,
        dims.slots,
        dims.rooms,
        dims.lecturers,
        weights.span,
        weights.workload_balance,
        weights.lunch
    );

    let mut vars = ProblemVariables::new();
    let vs = VarSet::with_panels(&mut vars, &dims);
    let mut constraints: Vec<Constraint> = Vec::new();
    model::schedule_each_project_once(&vs, &dims, &mut constraints);
    model::one_project_per_room_slot(&vs, &dims, &mut constraints);
    model::block_student_unavailability(cfg, &idx, &vs, &dims, &mut constraints)?;
    model::fill_panels(&vs, &dims, cfg.constraints.panel_size, &mut constraints);
    model::link_presence(&vs, &dims, &mut constraints);
    model::require_supervisor_on_panel(cfg, &idx, &vs, &mut constraints)?;
    model::block_lecturer_unavailability(cfg, &vs, &dims, &mut constraints);
    model::forbid_double_booking(&vs, &dims, &mut constraints);
    model::cap_daily_load(cfg, &vs, &dims, &mut constraints);

    // terms with weight zero are dropped, not scaled to zero
    let mut objective = Expression::default();
    if weights.span > 0 {
        let last_t = objective::compactness_var(&mut vars, &vs, &dims, &mut constraints);
        objective += weights.span as f64 * last_t;
    }
    if weights.workload_balance > 0 {
        let imbalance = objective::imbalance_var(&mut vars, &vs, &dims, &mut constraints);
        objective += weights.workload_balance as f64 * imbalance;
    }
    if weights.lunch > 0 {
        let lunch_penalty = objective::lunch_var(&mut vars, cfg, &idx, &vs, &dims, &mut constraints);
        objective += weights.lunch as f64 * lunch_penalty;
    }
    if !any_term_active {
        debug!("slice3: all weights are zero, solving for feasibility only");
    }

    let outcome = driver::run(
        cfg,
        vars,
        &vs,
        objective,
        constraints,
        &cfg.constraints.solver,
        true,
    )?;
    if !outcome.status.is_feasible() {
        warn!("slice3: no feasible schedule ({})", outcome.status);
        return Ok(SolveResult::no_schedule(outcome.status, 3));
    }

    let span = result::latest_slot_index(&outcome.entries, &idx);
    let imbalance = result::panel_imbalance(&outcome.entries, cfg);
    let lunch_penalty = result::lunch_hits(&outcome.entries, cfg);
    let objective_value = if any_term_active {
        Some(
            weights.span as i64 * span
                + weights.workload_balance as i64 * imbalance
                + weights.lunch as i64 * lunch_penalty,
        )
    } else {
        None
    };

    let mut stats = BTreeMap::new();
    stats.insert("wall_time_s".to_string(), outcome.wall_time_s.into());
    stats.insert("last_t".to_string(), span.into());
    stats.insert("imbalance".to_string(), imbalance.into());
    stats.insert("lunch_penalty".to_string(), lunch_penalty.into());
    Ok(SolveResult {
        status: outcome.status,
        objective_value,
        entries: outcome.entries,
        diagnostics: Vec::new(),
        stats,
    })
}
