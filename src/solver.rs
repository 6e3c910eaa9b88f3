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

//! The constraint model core: builds a 0/1 integer program for the selected slice and
//! optimises it with the HiGHS backend.
//!
//! The three slices are a debugging aid for infeasible configurations. Slice 1 only
//! places projects into (timeslot, room) pairs, slice 2 adds panel composition and
//! lecturer availability, slice 3 adds the weighted soft objectives. An infeasibility
//! that first appears at slice N locates the offending constraint class.

pub mod index;
pub mod precheck;
pub mod result;

mod driver;
mod model;
mod objective;
mod slice1;
mod slice2;
mod slice3;


use crate::Config;
use result::SolveResult;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("unknown solver level {0:?}")]
    UnknownLevel(String),
    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("unknown {kind} id {id:?}")]
    UnknownId { kind: &'static str, id: String },
    /// A backend failure that is neither infeasibility, unboundedness nor a time
    /// limit. Passed through to the caller instead of being folded into a status.
    #[error("solver backend fault: {0}")]
    BackendFault(String),
}

/// The three progressive constraint sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    One,
    Two,
    Three,
}

impl FromStr for Slice {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "slice1" => Ok(Slice::One),
            "2" | "slice2" => Ok(Slice::Two),
            "3" | "slice3" | "full" => Ok(Slice::Three),
            _ => Err(SolveError::UnknownLevel(s.to_string())),
        }
    }
}

/// Solve the given configuration at the given level.
///
/// `level` is one of `slice1`, `slice2`, `slice3` or the aliases `1`, `2`, `3`, `full`.
/// Infeasibility is reported through [`result::SolveStatus`], never as an error; a
/// genuinely failing backend surfaces as [`SolveError::BackendFault`]. Callers are
/// expected to run [`precheck::precheck`] first or accept `MODEL_INVALID` and
/// `INFEASIBLE` outcomes for configurations the precheck would have rejected.
pub fn solve(cfg: &Config, level: &str) -> Result<SolveResult, SolveError> {
    match level.parse::<Slice>()? {
        Slice::One => slice1::solve(cfg),
        Slice::Two => slice2::solve(cfg),
        Slice::Three => slice3::solve(cfg),
    }
}
