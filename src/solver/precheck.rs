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

//! Feasibility inspection of a configuration before the solver runs.
//!
//! The backend only answers INFEASIBLE with no explanation, so obvious structural
//! problems are reported here with messages a user can act on. The solver itself never
//! calls this module; the command line driver and other frontends run it first.

use crate::Config;
use std::collections::HashSet;
use thiserror::Error;

/// One or more hard precheck errors, one message per line.
#[derive(Debug, Error)]
#[error("{}", .errors.join("\n"))]
pub struct PrecheckError {
    pub errors: Vec<String>,
}

/// Inspect `cfg` and return hard errors and soft warnings.
///
/// Errors describe configurations that cannot produce a feasible schedule or that
/// reference unknown entities. Warnings describe suspicious but solvable input.
pub fn precheck(cfg: &Config) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let known_slots: HashSet<&str> = cfg.timeslots.iter().map(|s| s.id.as_str()).collect();
    let known_lecturers: HashSet<&str> = cfg.lecturers.iter().map(|l| l.id.as_str()).collect();
    let known_students: HashSet<&str> = cfg.students.iter().map(|s| s.id.as_str()).collect();

    let capacity = cfg.constraints.rooms as usize * cfg.timeslots.len();
    if capacity < cfg.projects.len() {
        errors.push(format!(
            "Not enough slots: {} room(s) x {} timeslot(s) = {}, but {} project(s) need a place.",
            cfg.constraints.rooms,
            cfg.timeslots.len(),
            capacity,
            cfg.projects.len()
        ));
    }

    if cfg.constraints.panel_size as usize > cfg.lecturers.len() {
        errors.push(format!(
            "panel_size ({}) is bigger than the number of lecturers ({}).",
            cfg.constraints.panel_size,
            cfg.lecturers.len()
        ));
    }

    for project in &cfg.projects {
        if cfg.constraints.must_include_supervisor {
            match project.supervisor_lecturer_id.as_deref() {
                None => errors.push(format!(
                    "Project {:?} has no supervisor set but must_include_supervisor is enabled.",
                    project.id
                )),
                Some(sup) if !known_lecturers.contains(sup) => errors.push(format!(
                    "Project {:?} references unknown supervisor {:?}.",
                    project.id, sup
                )),
                Some(sup) => {
                    if let Some(lecturer) = cfg.lecturer(sup) {
                        if lecturer.available_slot_ids.is_empty() {
                            errors.push(format!(
                                "Project {:?}: supervisor {:?} has no available slots.",
                                project.id, sup
                            ));
                        }
                    }
                }
            }
        }
        for sid in &project.student_ids {
            if !known_students.contains(sid.as_str()) {
                errors.push(format!(
                    "Project {:?} references unknown student {:?}.",
                    project.id, sid
                ));
            }
        }
    }

    for lecturer in &cfg.lecturers {
        let bad: Vec<&str> = lecturer
            .available_slot_ids
            .iter()
            .map(String::as_str)
            .filter(|s| !known_slots.contains(s))
            .collect();
        if !bad.is_empty() {
            errors.push(format!(
                "Lecturer {:?} has unknown slot ids: {:?}",
                lecturer.id, bad
            ));
        }
        if lecturer.available_slot_ids.is_empty() {
            warnings.push(format!(
                "Lecturer {:?} has no available slots.",
                lecturer.id
            ));
        }
    }

    for student in &cfg.students {
        let bad: Vec<&str> = student
            .unavailable_slot_ids
            .iter()
            .map(String::as_str)
            .filter(|s| !known_slots.contains(s))
            .collect();
        if !bad.is_empty() {
            errors.push(format!(
                "Student {:?} has unknown slot ids: {:?}",
                student.id, bad
            ));
        }
    }

    let bad_lunch: Vec<&str> = cfg
        .constraints
        .lunch_slot_ids
        .iter()
        .map(String::as_str)
        .filter(|s| !known_slots.contains(s))
        .collect();
    if !bad_lunch.is_empty() {
        errors.push(format!("lunch_slot_ids has unknown slot ids: {:?}", bad_lunch));
    }

    (errors, warnings)
}

/// Run the precheck and fail hard on the first batch of errors.
pub fn ensure_ok(cfg: &Config) -> Result<(), PrecheckError> {
    let (errors, _) = precheck(cfg);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PrecheckError { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lecturer, Project, Student, TimeSlot};

    fn slot(id: &str) -> TimeSlot {
        TimeSlot {
            id: id.into(),
            date: "2026-03-10".parse().unwrap(),
            start: "09:00".into(),
            end: "09:30".into(),
            label: String::new(),
        }
    }

    fn valid_cfg() -> Config {
        let mut cfg = Config::default();
        cfg.timeslots = vec![slot("S1"), slot("S2")];
        cfg.lecturers = vec![
            Lecturer {
                id: "L1".into(),
                name: "A".into(),
                available_slot_ids: vec!["S1".into(), "S2".into()],
                max_per_day: None,
                max_total: None,
            },
            Lecturer {
                id: "L2".into(),
                name: "B".into(),
                available_slot_ids: vec!["S1".into(), "S2".into()],
                max_per_day: None,
                max_total: None,
            },
        ];
        cfg.students = vec![Student {
            id: "ST1".into(),
            name: "C".into(),
            unavailable_slot_ids: vec![],
        }];
        cfg.projects = vec![Project {
            id: "P1".into(),
            title: "P1".into(),
            student_ids: vec!["ST1".into()],
            supervisor_lecturer_id: Some("L1".into()),
        }];
        cfg
    }

    #[test]
    fn a_valid_config_passes() {
        let (errors, warnings) = precheck(&valid_cfg());
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
        assert!(ensure_ok(&valid_cfg()).is_ok());
    }

    #[test]
    fn detects_capacity_shortfall() {
        let mut cfg = valid_cfg();
        cfg.timeslots.truncate(1);
        cfg.projects.push(Project {
            id: "P2".into(),
            title: "P2".into(),
            student_ids: vec![],
            supervisor_lecturer_id: Some("L2".into()),
        });
        let (errors, _) = precheck(&cfg);
        assert!(errors.iter().any(|e| e.contains("Not enough slots")));
    }

    #[test]
    fn detects_oversized_panel() {
        let mut cfg = valid_cfg();
        cfg.constraints.panel_size = 3;
        let (errors, _) = precheck(&cfg);
        assert!(errors.iter().any(|e| e.contains("panel_size")));
    }

    #[test]
    fn detects_missing_supervisor() {
        let mut cfg = valid_cfg();
        cfg.projects[0].supervisor_lecturer_id = None;
        let (errors, _) = precheck(&cfg);
        assert!(errors.iter().any(|e| e.contains("no supervisor")));
    }

    #[test]
    fn detects_supervisor_without_availability() {
        let mut cfg = valid_cfg();
        cfg.lecturers[0].available_slot_ids.clear();
        let (errors, warnings) = precheck(&cfg);
        assert!(errors.iter().any(|e| e.contains("no available slots")));
        assert!(warnings.iter().any(|w| w.contains("L1")));
    }

    #[test]
    fn missing_supervisor_is_fine_when_not_required() {
        let mut cfg = valid_cfg();
        cfg.constraints.must_include_supervisor = false;
        cfg.projects[0].supervisor_lecturer_id = None;
        let (errors, _) = precheck(&cfg);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn detects_unknown_references() {
        let mut cfg = valid_cfg();
        cfg.projects[0].student_ids.push("STX".into());
        cfg.lecturers[0].available_slot_ids.push("SX".into());
        cfg.students[0].unavailable_slot_ids.push("SY".into());
        cfg.constraints.lunch_slot_ids.push("SZ".into());
        let (errors, _) = precheck(&cfg);
        assert!(errors.iter().any(|e| e.contains("unknown student")));
        assert!(errors.iter().any(|e| e.contains("Lecturer \"L1\"")));
        assert!(errors.iter().any(|e| e.contains("Student \"ST1\"")));
        assert!(errors.iter().any(|e| e.contains("lunch_slot_ids")));
    }

    #[test]
    fn ensure_ok_joins_messages() {
        let mut cfg = valid_cfg();
        cfg.timeslots.clear();
        cfg.lecturers[0].available_slot_ids.clear();
        cfg.lecturers[1].available_slot_ids.clear();
        let err = ensure_ok(&cfg).unwrap_err();
        assert!(err.to_string().contains("Not enough slots"));
        assert!(err.errors.len() >= 2);
    }
}
