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

//! Reading and writing of configuration and result documents in the JSON format.
//!
//! The document layout matches the canonical serde serialization of [`Config`], with all
//! keys of the `constraints` block optional. For backward compatibility with older
//! documents, `constraints.solver.num_search_workers` is accepted as an alias for
//! `num_workers`.

use crate::solver::result::SolveResult;
use crate::Config;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate id {id:?} in {collection}")]
    DuplicateId { collection: &'static str, id: String },
    #[error("{0}")]
    Invalid(String),
}

/// Read and validate a configuration document from a Reader (e.g. an input file).
pub fn read_config<R: Read>(reader: R) -> Result<Config, ConfigError> {
    let mut cfg: Config = serde_json::from_reader(reader)?;
    for project in cfg.projects.iter_mut() {
        if project.supervisor_lecturer_id.as_deref() == Some("") {
            project.supervisor_lecturer_id = None;
        }
    }
    validate(&cfg)?;
    Ok(cfg)
}

/// Read and validate the configuration document at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    read_config(File::open(path)?)
}

/// Write a configuration document to a Writer (e.g. an output file).
pub fn write_config<W: Write>(writer: W, cfg: &Config) -> Result<(), ConfigError> {
    serde_json::to_writer_pretty(writer, cfg)?;
    Ok(())
}

/// Write the configuration document to `path`.
pub fn save_config<P: AsRef<Path>>(cfg: &Config, path: P) -> Result<(), ConfigError> {
    write_config(File::create(path)?, cfg)
}

/// Write a solve result document to a Writer. Field names are stable; room numbers stay
/// 0-based in this representation.
pub fn write_result<W: Write>(writer: W, result: &SolveResult) -> Result<(), ConfigError> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.constraints.rooms < 1 {
        return Err(ConfigError::Invalid(
            "constraints.rooms must be >= 1".into(),
        ));
    }
    if cfg.constraints.panel_size < 1 {
        return Err(ConfigError::Invalid(
            "constraints.panel_size must be >= 1".into(),
        ));
    }
    check_unique_ids(cfg.timeslots.iter().map(|s| s.id.as_str()), "timeslots")?;
    check_unique_ids(cfg.lecturers.iter().map(|l| l.id.as_str()), "lecturers")?;
    check_unique_ids(cfg.students.iter().map(|s| s.id.as_str()), "students")?;
    check_unique_ids(cfg.projects.iter().map(|p| p.id.as_str()), "projects")?;
    Ok(())
}

/// Duplicate ids would silently merge entities during constraint emission.
fn check_unique_ids<'a, I>(ids: I, collection: &'static str) -> Result<(), ConfigError>
where
    I: Iterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "empty or missing id in {}",
                collection
            )));
        }
        if !seen.insert(id) {
            return Err(ConfigError::DuplicateId {
                collection,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    const FULL_DOC: &str = r#"{
        "meta": {"semester": "2026S"},
        "timeslots": [
            {"id": "S1", "date": "2026-03-10", "start": "09:00", "end": "09:30"},
            {"id": "S2", "date": "2026-03-10", "start": "09:30", "end": "10:00", "label": "late"}
        ],
        "lecturers": [
            {"id": "L1", "name": "A", "available_slot_ids": ["S1", "S2"], "max_per_day": 4}
        ],
        "students": [{"id": "ST1", "name": "B", "unavailable_slot_ids": ["S2"]}],
        "projects": [
            {"id": "P1", "title": "P1", "student_ids": ["ST1"], "supervisor_lecturer_id": "L1"}
        ],
        "constraints": {
            "rooms": 2,
            "panel_size": 1,
            "must_include_supervisor": false,
            "lunch_slot_ids": ["S2"],
            "weights": {"span": 5},
            "solver": {"max_time_in_seconds": 3.0, "num_workers": 1}
        }
    }"#;

    #[test]
    fn reads_a_complete_document() {
        let cfg = read_config(FULL_DOC.as_bytes()).unwrap();
        assert_eq!(cfg.timeslots.len(), 2);
        assert_eq!(cfg.timeslots[1].label, "late");
        assert_eq!(cfg.timeslots[0].date.to_string(), "2026-03-10");
        assert_eq!(cfg.lecturers[0].max_per_day, Some(4));
        assert_eq!(cfg.lecturers[0].max_total, None);
        assert_eq!(cfg.students[0].unavailable_slot_ids, vec!["S2"]);
        assert_eq!(
            cfg.projects[0].supervisor_lecturer_id.as_deref(),
            Some("L1")
        );
        assert_eq!(cfg.constraints.rooms, 2);
        assert_eq!(cfg.constraints.panel_size, 1);
        assert!(!cfg.constraints.must_include_supervisor);
        assert_eq!(cfg.constraints.lunch_slot_ids, vec!["S2"]);
        assert_float_absolute_eq!(cfg.constraints.solver.max_time_in_seconds, 3.0);
        assert_eq!(cfg.constraints.solver.num_workers, 1);
        assert_eq!(cfg.meta["semester"], "2026S");
    }

    #[test]
    fn partial_weights_keep_the_remaining_defaults() {
        let cfg = read_config(FULL_DOC.as_bytes()).unwrap();
        assert_eq!(cfg.constraints.weights.span, 5);
        assert_eq!(cfg.constraints.weights.workload_balance, 10);
        assert_eq!(cfg.constraints.weights.lunch, 3);
    }

    #[test]
    fn applies_defaults_for_missing_constraints() {
        let doc = r#"{"timeslots": [], "lecturers": [], "students": [], "projects": []}"#;
        let cfg = read_config(doc.as_bytes()).unwrap();
        assert_eq!(cfg.constraints.rooms, 1);
        assert_eq!(cfg.constraints.panel_size, 2);
        assert!(cfg.constraints.must_include_supervisor);
        assert_eq!(cfg.constraints.weights.span, 1);
        assert_eq!(cfg.constraints.weights.workload_balance, 10);
        assert_eq!(cfg.constraints.weights.lunch, 3);
        assert_float_absolute_eq!(cfg.constraints.solver.max_time_in_seconds, 10.0);
        assert_eq!(cfg.constraints.solver.num_workers, 0);
    }

    #[test]
    fn accepts_null_meta_and_constraints() {
        let doc = r#"{
            "meta": null,
            "timeslots": [], "lecturers": [], "students": [], "projects": [],
            "constraints": null
        }"#;
        let cfg = read_config(doc.as_bytes()).unwrap();
        assert!(cfg.meta.is_empty());
        assert_eq!(cfg.constraints.rooms, 1);
    }

    #[test]
    fn maps_legacy_worker_field() {
        let doc = r#"{
            "timeslots": [], "lecturers": [], "students": [], "projects": [],
            "constraints": {"solver": {"num_search_workers": 4}}
        }"#;
        let cfg = read_config(doc.as_bytes()).unwrap();
        assert_eq!(cfg.constraints.solver.num_workers, 4);
    }

    #[test]
    fn normalises_empty_supervisor_to_none() {
        let doc = r#"{
            "timeslots": [], "lecturers": [], "students": [],
            "projects": [{"id": "P1", "title": "T", "supervisor_lecturer_id": ""}]
        }"#;
        let cfg = read_config(doc.as_bytes()).unwrap();
        assert_eq!(cfg.projects[0].supervisor_lecturer_id, None);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let doc = r#"{
            "timeslots": [
                {"id": "S1", "date": "2026-03-10", "start": "09:00", "end": "09:30"},
                {"id": "S1", "date": "2026-03-10", "start": "09:30", "end": "10:00"}
            ],
            "lecturers": [], "students": [], "projects": []
        }"#;
        match read_config(doc.as_bytes()) {
            Err(ConfigError::DuplicateId { collection, id }) => {
                assert_eq!(collection, "timeslots");
                assert_eq!(id, "S1");
            }
            other => panic!("expected DuplicateId, got {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_rooms() {
        let doc = r#"{
            "timeslots": [], "lecturers": [], "students": [], "projects": [],
            "constraints": {"rooms": 0}
        }"#;
        assert!(matches!(
            read_config(doc.as_bytes()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_collections_are_an_error() {
        let doc = r#"{"timeslots": []}"#;
        assert!(matches!(
            read_config(doc.as_bytes()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn result_documents_keep_their_field_names() {
        use crate::solver::result::{ScheduleEntry, SolveStatus};
        use std::collections::BTreeMap;

        let mut stats = BTreeMap::new();
        stats.insert("wall_time_s".to_string(), serde_json::Value::from(0.004));
        let result = SolveResult {
            status: SolveStatus::Optimal,
            objective_value: Some(1),
            entries: vec![ScheduleEntry {
                project_id: "P1".into(),
                timeslot_id: "S1".into(),
                room: 0,
                panel_lecturer_ids: vec!["L1".into()],
            }],
            diagnostics: vec![],
            stats,
        };
        let mut buf = Vec::new();
        write_result(&mut buf, &result).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(doc["status"], "OPTIMAL");
        assert_eq!(doc["objective_value"], 1);
        assert_eq!(doc["entries"][0]["project_id"], "P1");
        assert_eq!(doc["entries"][0]["room"], 0);
        assert_eq!(doc["entries"][0]["panel_lecturer_ids"][0], "L1");
        assert_eq!(doc["stats"]["wall_time_s"], 0.004);
    }

    #[test]
    fn config_documents_round_trip() {
        let cfg = read_config(FULL_DOC.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_config(&mut buf, &cfg).unwrap();
        let reread = read_config(buf.as_slice()).unwrap();
        assert_eq!(cfg, reread);
    }
}
