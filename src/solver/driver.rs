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

//! Invocation of the HiGHS backend and extraction of schedule entries.

use super::model::VarSet;
use super::result::{ScheduleEntry, SolveStatus};
use super::SolveError;
use crate::{Config, SolverParams};
use good_lp::{
    default_solver, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    SolutionStatus, SolverModel,
};
use log::{debug, error, warn};
use std::time::Instant;

/// What one backend run produced. Entries are already sorted and deep copies of the
/// solver valuation, so the outcome stays valid after the backend state is dropped.
pub(super) struct Outcome {
    pub status: SolveStatus,
    pub entries: Vec<ScheduleEntry>,
    /// Wall clock of the solve call, rounded to milliseconds.
    pub wall_time_s: f64,
}

/// Run the search and extract the schedule.
///
/// `num_workers` semantics: 0 lets the backend use all detected cores, 1 forces the
/// single-threaded reproducible search, any other value is taken literally.
///
/// A solution proven optimal reports `OPTIMAL`; an incumbent cut short by the time or
/// gap limit reports `FEASIBLE`; a budget exhausted before any schedule was found
/// reports `UNKNOWN`. Infeasible and unbounded models are statuses as well. Every
/// other backend fault is returned as an error, never mapped onto a status.
pub(super) fn run(
    cfg: &Config,
    vars: ProblemVariables,
    vs: &VarSet,
    objective: Expression,
    constraints: Vec<Constraint>,
    params: &SolverParams,
    with_panels: bool,
) -> Result<Outcome, SolveError> {
    let threads = match params.num_workers {
        0 => num_cpus::get() as u32,
        n => n,
    };
    debug!(
        "Posting {} constraints, time budget {}s, {} worker(s)",
        constraints.len(),
        params.max_time_in_seconds,
        threads
    );

    let mut model = vars
        .minimise(objective)
        .using(default_solver)
        .set_option("output_flag", false)
        .set_option("time_limit", params.max_time_in_seconds)
        .set_option("threads", threads as i32)
        .set_option("parallel", if threads > 1 { "on" } else { "off" });
    for c in constraints {
        model.add_constraint(c);
    }

    let started = Instant::now();
    let solved = model.solve();
    let wall_time_s = (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0;

    match solved {
        Ok(solution) => {
            let entries = extract_entries(cfg, vs, &solution, with_panels);
            match solution.status() {
                SolutionStatus::Optimal => Ok(Outcome {
                    status: SolveStatus::Optimal,
                    entries,
                    wall_time_s,
                }),
                // time or gap limit: the valuation is only an incumbent if it
                // actually places every project exactly once
                _ if places_every_project_once(&entries, cfg) => Ok(Outcome {
                    status: SolveStatus::Feasible,
                    entries,
                    wall_time_s,
                }),
                _ => {
                    warn!("Search budget exhausted before a first schedule was found");
                    Ok(Outcome {
                        status: SolveStatus::Unknown,
                        entries: Vec::new(),
                        wall_time_s,
                    })
                }
            }
        }
        Err(ResolutionError::Infeasible) => Ok(Outcome {
            status: SolveStatus::Infeasible,
            entries: Vec::new(),
            wall_time_s,
        }),
        Err(ResolutionError::Unbounded) => {
            error!("Backend rejected the model as unbounded");
            Ok(Outcome {
                status: SolveStatus::ModelInvalid,
                entries: Vec::new(),
                wall_time_s,
            })
        }
        Err(fault) => Err(SolveError::BackendFault(fault.to_string())),
    }
}

/// Whether the extracted entries form a complete schedule. On a time limit the
/// backend hands back whatever primal values it holds, which may be empty.
fn places_every_project_once(entries: &[ScheduleEntry], cfg: &Config) -> bool {
    if entries.len() != cfg.projects.len() {
        return false;
    }
    let scheduled: std::collections::HashSet<&str> =
        entries.iter().map(|e| e.project_id.as_str()).collect();
    scheduled.len() == cfg.projects.len()
}

/// Turn the variable valuation into schedule entries, ordered by (timeslot index, room).
fn extract_entries<S: Solution>(
    cfg: &Config,
    vs: &VarSet,
    solution: &S,
    with_panels: bool,
) -> Vec<ScheduleEntry> {
    let mut placed: Vec<(usize, usize, ScheduleEntry)> = Vec::with_capacity(cfg.projects.len());
    for (&(p, t, r), &xv) in vs.x.iter() {
        if solution.value(xv) < 0.5 {
            continue;
        }
        let panel = if with_panels {
            panel_of(cfg, vs, solution, p)
        } else {
            Vec::new()
        };
        placed.push((
            t,
            r,
            ScheduleEntry {
                project_id: cfg.projects[p].id.clone(),
                timeslot_id: cfg.timeslots[t].id.clone(),
                room: r as u32,
                panel_lecturer_ids: panel,
            },
        ));
    }
    placed.sort_by_key(|place| (place.0, place.1));
    placed.into_iter().map(|(_, _, entry)| entry).collect()
}

/// Panel members of project `p`, enumerated in lecturer index order.
fn panel_of<S: Solution>(cfg: &Config, vs: &VarSet, solution: &S, p: usize) -> Vec<String> {
    (0..cfg.lecturers.len())
        .filter(|&l| solution.value(vs.y[&(p, l)]) > 0.5)
        .map(|l| cfg.lecturers[l].id.clone())
        .collect()
}
