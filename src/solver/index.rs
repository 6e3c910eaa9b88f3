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

//! Dense integer indexing of the configuration's string identifiers.
//!
//! All constraint emission happens in dense index space; serialised output maps back to
//! the ids. The four maps are bijections as long as the upstream uniqueness invariant
//! holds, which [`build_index`] re-checks defensively.

use super::SolveError;
use crate::Config;
use std::collections::HashMap;

/// Bijections from entity ids to their positions in the configuration sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdIndex {
    pub slot_id_to_idx: HashMap<String, usize>,
    pub lecturer_id_to_idx: HashMap<String, usize>,
    pub student_id_to_idx: HashMap<String, usize>,
    pub project_id_to_idx: HashMap<String, usize>,
}

/// Build the id index for a configuration.
pub fn build_index(cfg: &Config) -> Result<IdIndex, SolveError> {
    Ok(IdIndex {
        slot_id_to_idx: index_ids(cfg.timeslots.iter().map(|s| s.id.as_str()), "timeslot")?,
        lecturer_id_to_idx: index_ids(cfg.lecturers.iter().map(|l| l.id.as_str()), "lecturer")?,
        student_id_to_idx: index_ids(cfg.students.iter().map(|s| s.id.as_str()), "student")?,
        project_id_to_idx: index_ids(cfg.projects.iter().map(|p| p.id.as_str()), "project")?,
    })
}

fn index_ids<'a, I>(ids: I, kind: &'static str) -> Result<HashMap<String, usize>, SolveError>
where
    I: Iterator<Item = &'a str>,
{
    let mut map = HashMap::new();
    for (i, id) in ids.enumerate() {
        if map.insert(id.to_string(), i).is_some() {
            return Err(SolveError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lecturer, Student};

    #[test]
    fn indexes_follow_sequence_order() {
        let mut cfg = Config::default();
        cfg.students = vec![
            Student {
                id: "ST1".into(),
                name: "A".into(),
                unavailable_slot_ids: vec![],
            },
            Student {
                id: "ST2".into(),
                name: "B".into(),
                unavailable_slot_ids: vec![],
            },
        ];
        let idx = build_index(&cfg).unwrap();
        assert_eq!(idx.student_id_to_idx["ST1"], 0);
        assert_eq!(idx.student_id_to_idx["ST2"], 1);
        assert!(idx.slot_id_to_idx.is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut cfg = Config::default();
        cfg.lecturers = vec![
            Lecturer {
                id: "L1".into(),
                name: "A".into(),
                available_slot_ids: vec![],
                max_per_day: None,
                max_total: None,
            },
            Lecturer {
                id: "L1".into(),
                name: "B".into(),
                available_slot_ids: vec![],
                max_per_day: None,
                max_total: None,
            },
        ];
        match build_index(&cfg) {
            Err(SolveError::DuplicateId { kind, id }) => {
                assert_eq!(kind, "lecturer");
                assert_eq!(id, "L1");
            }
            other => panic!("expected DuplicateId, got {:?}", other),
        }
    }
}
