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

//! Scheduling of final-year project assessment sessions: every project gets exactly one
//! (timeslot, room) pair and a panel of lecturers, subject to availability, supervisor,
//! capacity and workload constraints.

pub mod io;
pub mod solver;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One bookable assessment timeslot.
///
/// The order of the `timeslots` sequence in a [`Config`] is the canonical chronological
/// order. The compactness objective and all presentation sorting rely on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: String,
    /// Calendar date of the slot. Daily caps group slots by this value.
    pub date: NaiveDate,
    /// Wall clock start, `HH:MM`.
    pub start: String,
    /// Wall clock end, `HH:MM`.
    pub end: String,
    #[serde(default)]
    pub label: String,
}

/// A lecturer who can sit on assessment panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: String,
    /// Lecturer's name. Mainly used for info/debug output.
    pub name: String,
    /// Ids of the timeslots this lecturer can be scheduled in.
    #[serde(default)]
    pub available_slot_ids: Vec<String>,
    /// Maximum number of assessments per calendar day.
    #[serde(default)]
    pub max_per_day: Option<u32>,
    /// Maximum number of assessments overall. Parsed but not enforced by the solver yet.
    #[serde(default)]
    pub max_total: Option<u32>,
}

/// A student whose project is being assessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Ids of the timeslots this student cannot attend.
    #[serde(default)]
    pub unavailable_slot_ids: Vec<String>,
}

/// A final-year project. Students and the supervisor are linked by id, never embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub student_ids: Vec<String>,
    /// The loader normalises an empty string in the input document to `None`.
    #[serde(default)]
    pub supervisor_lecturer_id: Option<String>,
}

/// Weights of the soft objective terms. A weight of zero drops the term entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default = "default_span_weight")]
    pub span: u32,
    #[serde(default = "default_workload_weight")]
    pub workload_balance: u32,
    #[serde(default = "default_lunch_weight")]
    pub lunch: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            span: default_span_weight(),
            workload_balance: default_workload_weight(),
            lunch: default_lunch_weight(),
        }
    }
}

/// Resource budget handed to the solver backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    #[serde(default = "default_max_time")]
    pub max_time_in_seconds: f64,
    /// 0 means all detected cores, 1 is single-threaded reproducible search.
    #[serde(default, alias = "num_search_workers")]
    pub num_workers: u32,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            max_time_in_seconds: default_max_time(),
            num_workers: 0,
        }
    }
}

/// Scheduling constraints and objective configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Number of interchangeable rooms available in every timeslot.
    #[serde(default = "default_rooms")]
    pub rooms: u32,
    /// Number of lecturers on every assessment panel.
    #[serde(default = "default_panel_size")]
    pub panel_size: u32,
    #[serde(default = "default_must_include_supervisor")]
    pub must_include_supervisor: bool,
    /// Ids of timeslots that are penalised by the lunch objective term.
    #[serde(default)]
    pub lunch_slot_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub weights: Weights,
    #[serde(default, deserialize_with = "null_to_default")]
    pub solver: SolverParams,
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            rooms: default_rooms(),
            panel_size: default_panel_size(),
            must_include_supervisor: true,
            lunch_slot_ids: Vec::new(),
            weights: Weights::default(),
            solver: SolverParams::default(),
        }
    }
}

/// A complete, validated scheduling configuration. Read-only for the solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "null_to_default")]
    pub meta: serde_json::Map<String, serde_json::Value>,
    pub timeslots: Vec<TimeSlot>,
    pub lecturers: Vec<Lecturer>,
    pub students: Vec<Student>,
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub constraints: Constraints,
}

impl Config {
    pub fn lecturer(&self, id: &str) -> Option<&Lecturer> {
        self.lecturers.iter().find(|l| l.id == id)
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

/// Treats an explicit `null` in the document like an absent key.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_span_weight() -> u32 {
    1
}

fn default_workload_weight() -> u32 {
    10
}

fn default_lunch_weight() -> u32 {
    3
}

fn default_max_time() -> f64 {
    10.0
}

fn default_rooms() -> u32 {
    1
}

fn default_panel_size() -> u32 {
    2
}

fn default_must_include_supervisor() -> bool {
    true
}
