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

pub mod json;

use crate::solver::result::SolveResult;
use crate::Config;
use std::fmt::Write;

/// Format a calculated schedule into a human readable String (e.g. to print it to
/// stdout).
///
/// The output format will look like
/// ```text
/// ===== 2026-03-10 09:00-09:30 =====
/// - room 1: Vision-based Sorting (panel: Alice Aman, Bob Berg)
///
/// ===== 2026-03-10 09:30-10:00 =====
/// - room 1: Packet Tracing at Scale (panel: Bob Berg, Carol Chen)
/// ```
///
/// Timeslots appear in chronological order and rooms are rendered 1-based.
pub fn format_schedule(result: &SolveResult, cfg: &Config) -> String {
    let mut out = String::new();
    for slot in cfg.timeslots.iter() {
        let in_slot: Vec<_> = result
            .entries
            .iter()
            .filter(|e| e.timeslot_id == slot.id)
            .collect();
        if in_slot.is_empty() {
            continue;
        }
        write!(out, "\n===== {} {}-{}", slot.date, slot.start, slot.end).unwrap();
        if !slot.label.is_empty() {
            write!(out, " ({})", slot.label).unwrap();
        }
        writeln!(out, " =====").unwrap();
        for entry in in_slot {
            let title = cfg
                .project(&entry.project_id)
                .map(|p| p.title.as_str())
                .unwrap_or(entry.project_id.as_str());
            write!(out, "- room {}: {}", entry.room + 1, title).unwrap();
            if !entry.panel_lecturer_ids.is_empty() {
                let panel: Vec<&str> = entry
                    .panel_lecturer_ids
                    .iter()
                    .map(|lid| {
                        cfg.lecturer(lid)
                            .map(|l| l.name.as_str())
                            .unwrap_or(lid.as_str())
                    })
                    .collect();
                write!(out, " (panel: {})", panel.join(", ")).unwrap();
            }
            writeln!(out).unwrap();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::result::{ScheduleEntry, SolveStatus};
    use crate::{Lecturer, Project, TimeSlot};
    use std::collections::BTreeMap;

    #[test]
    fn formats_rooms_one_based_and_groups_by_slot() {
        let mut cfg = Config::default();
        cfg.timeslots = vec![TimeSlot {
            id: "TS1".into(),
            date: "2026-03-10".parse().unwrap(),
            start: "09:00".into(),
            end: "09:30".into(),
            label: "opening".into(),
        }];
        cfg.lecturers = vec![Lecturer {
            id: "L1".into(),
            name: "Alice".into(),
            available_slot_ids: vec!["TS1".into()],
            max_per_day: None,
            max_total: None,
        }];
        cfg.projects = vec![Project {
            id: "P1".into(),
            title: "Vision-based Sorting".into(),
            student_ids: vec![],
            supervisor_lecturer_id: Some("L1".into()),
        }];
        let result = SolveResult {
            status: SolveStatus::Optimal,
            objective_value: Some(0),
            entries: vec![ScheduleEntry {
                project_id: "P1".into(),
                timeslot_id: "TS1".into(),
                room: 0,
                panel_lecturer_ids: vec!["L1".into()],
            }],
            diagnostics: vec![],
            stats: BTreeMap::new(),
        };
        let rendered = format_schedule(&result, &cfg);
        assert!(rendered.contains("===== 2026-03-10 09:00-09:30 (opening) ====="));
        assert!(rendered.contains("- room 1: Vision-based Sorting (panel: Alice)"));
    }
}
