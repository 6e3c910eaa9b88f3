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

//! Auxiliary integer variables for the soft objective terms.
//!
//! All three terms are expressed through bounds that become tight under minimisation
//! pressure, so no large constants enter the model. A term whose weight is zero is not
//! declared at all; the reported stats are recomputed from the extracted entries
//! instead of read back from these variables.

use super::index::IdIndex;
use super::model::{Dims, VarSet};
use crate::Config;
use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use itertools::iproduct;
use std::collections::HashSet;

/// `last_t`, an upper bound on the index of every used timeslot.
///
/// Minimising it packs the schedule into the earliest contiguous prefix of the
/// timeslot sequence.
pub(super) fn compactness_var(
    vars: &mut ProblemVariables,
    vs: &VarSet,
    dims: &Dims,
    out: &mut Vec<Constraint>,
) -> Variable {
    let upper = dims.slots.saturating_sub(1) as f64;
    let last_t = vars.add(variable().integer().min(0).max(upper).name("last_t"));
    for (&(_, t, _), &xv) in vs.x.iter() {
        out.push(constraint!(last_t >= (t as f64) * xv));
    }
    last_t
}

/// `lunch_penalty`, the number of assessments landing in a marked lunch slot.
///
/// Pinned to zero when no lunch slots are configured. Lunch slot ids that do not
/// resolve to a timeslot are skipped; the precheck reports them upstream.
pub(super) fn lunch_var(
    vars: &mut ProblemVariables,
    cfg: &Config,
    idx: &IdIndex,
    vs: &VarSet,
    dims: &Dims,
    out: &mut Vec<Constraint>,
) -> Variable {
    let lunch_t: HashSet<usize> = cfg
        .constraints
        .lunch_slot_ids
        .iter()
        .filter_map(|sid| idx.slot_id_to_idx.get(sid).copied())
        .collect();
    let penalty = vars.add(
        variable()
            .integer()
            .min(0)
            .max(dims.projects as f64)
            .name("lunch_penalty"),
    );
    if lunch_t.is_empty() {
        out.push(constraint!(penalty == 0));
    } else {
        let hits: Expression = vs
            .x
            .iter()
            .filter(|(key, _)| lunch_t.contains(&key.1))
            .map(|(_, &xv)| xv)
            .sum();
        out.push(constraint!(penalty == hits));
    }
    penalty
}

/// `imbalance`, the gap between the busiest and the least busy lecturer.
///
/// `count_l` is the number of panel appearances of lecturer `l`. `max_c` bounds every
/// count from above and `min_c` from below; minimising their difference drives both
/// onto the true extremes.
pub(super) fn imbalance_var(
    vars: &mut ProblemVariables,
    vs: &VarSet,
    dims: &Dims,
    out: &mut Vec<Constraint>,
) -> Variable {
    let most = dims.projects as f64;
    let mut counts = Vec::with_capacity(dims.lecturers);
    for l in 0..dims.lecturers {
        let count = vars.add(
            variable()
                .integer()
                .min(0)
                .max(most)
                .name(format!("count_l{}", l)),
        );
        let appearances: Expression = iproduct!(0..dims.projects, 0..dims.slots, 0..dims.rooms)
            .map(|(p, t, r)| vs.z[&(p, l, t, r)])
            .sum();
        out.push(constraint!(count == appearances));
        counts.push(count);
    }
    let max_c = vars.add(variable().integer().min(0).max(most).name("max_c"));
    let min_c = vars.add(variable().integer().min(0).max(most).name("min_c"));
    let imbalance = vars.add(variable().integer().min(0).max(most).name("imbalance"));
    for &count in &counts {
        out.push(constraint!(max_c >= count));
        out.push(constraint!(min_c <= count));
    }
    out.push(constraint!(imbalance == max_c - min_c));
    imbalance
}
