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

//! Result documents returned by the solver, plus the entry-derived schedule metrics.

use super::index::IdIndex;
use crate::Config;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Terminal classification of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// A solution was found and proven optimal.
    Optimal,
    /// A solution was found but not proven optimal (e.g. the time budget ran out first).
    Feasible,
    Infeasible,
    ModelInvalid,
    Unknown,
}

impl SolveStatus {
    /// Whether this status carries a usable schedule.
    pub fn is_feasible(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::ModelInvalid => "MODEL_INVALID",
            SolveStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// One scheduled assessment session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub project_id: String,
    pub timeslot_id: String,
    /// Room number, 0-based. Rendered 1-based for humans.
    pub room: u32,
    /// Panel members in lecturer index order. Empty for slice 1.
    pub panel_lecturer_ids: Vec<String>,
}

/// The complete outcome of one solve, independent of any solver state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Present iff the status carries a schedule and at least one soft term was active.
    pub objective_value: Option<i64>,
    /// Ordered by (timeslot index, room). Empty unless the status carries a schedule.
    pub entries: Vec<ScheduleEntry>,
    pub diagnostics: Vec<String>,
    pub stats: BTreeMap<String, serde_json::Value>,
}

impl SolveResult {
    /// Result for a configuration with nothing to schedule.
    pub(crate) fn empty_schedule(objective_value: Option<i64>) -> SolveResult {
        SolveResult {
            status: SolveStatus::Optimal,
            objective_value,
            entries: Vec::new(),
            diagnostics: Vec::new(),
            stats: BTreeMap::new(),
        }
    }

    /// Result for a solve that produced no usable schedule.
    pub(crate) fn no_schedule(status: SolveStatus, slice_no: u8) -> SolveResult {
        SolveResult {
            status,
            objective_value: None,
            entries: Vec::new(),
            diagnostics: vec![format!("No feasible schedule (slice{}).", slice_no)],
            stats: BTreeMap::new(),
        }
    }
}

/// Index of the latest used timeslot in chronological order, 0 for an empty schedule.
pub fn latest_slot_index(entries: &[ScheduleEntry], idx: &IdIndex) -> i64 {
    entries
        .iter()
        .filter_map(|e| idx.slot_id_to_idx.get(&e.timeslot_id))
        .max()
        .map(|t| *t as i64)
        .unwrap_or(0)
}

/// Number of entries landing in a marked lunch slot.
pub fn lunch_hits(entries: &[ScheduleEntry], cfg: &Config) -> i64 {
    let lunch: HashSet<&str> = cfg
        .constraints
        .lunch_slot_ids
        .iter()
        .map(String::as_str)
        .collect();
    entries
        .iter()
        .filter(|e| lunch.contains(e.timeslot_id.as_str()))
        .count() as i64
}

/// Difference between the busiest and the least busy lecturer, counted over panel
/// appearances of all lecturers in the configuration.
pub fn panel_imbalance(entries: &[ScheduleEntry], cfg: &Config) -> i64 {
    if cfg.lecturers.is_empty() {
        return 0;
    }
    let mut counts: BTreeMap<&str, i64> = cfg
        .lecturers
        .iter()
        .map(|l| (l.id.as_str(), 0))
        .collect();
    for entry in entries {
        for lid in &entry.panel_lecturer_ids {
            if let Some(count) = counts.get_mut(lid.as_str()) {
                *count += 1;
            }
        }
    }
    let max = counts.values().max().copied().unwrap_or(0);
    let min = counts.values().min().copied().unwrap_or(0);
    max - min
}
