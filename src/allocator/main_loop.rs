//! §4.6 — the greedy allocator: pop the best-ranked group, place it on its best shift,
//! re-rank or exhaust, repeat until the pool is empty or every shift is full.

use super::affinity;
use super::ranking;
use crate::criteria::Criterion;
use crate::ids::GroupId;
use crate::metrics::ordinary_allocated_count;
use crate::model::RotaState;

pub fn run(state: &mut RotaState, criteria: &[Box<dyn Criterion>], target_frequency: f64) {
    loop {
        if state.volunteer_state.ranking.is_empty() {
            break;
        }
        let group_id = state.volunteer_state.ranking.remove(0);

        let Some(shift_index) = find_best_shift(state, group_id, criteria) else {
            #[cfg(feature = "logging")]
            tracing::trace!(?group_id, "group exhausted: no valid shift remains");
            state.volunteer_state.exhausted.insert(group_id);
            continue;
        };

        #[cfg(feature = "logging")]
        tracing::debug!(?group_id, shift_index, "assigning group to shift");
        assign(state, group_id, shift_index);

        let group = state.volunteer_state.group(group_id);
        let cap = group
            .available_shift_indices
            .len()
            .min(state.max_allocation_count());
        if group.allocated_shift_indices.len() >= cap {
            #[cfg(feature = "logging")]
            tracing::trace!(?group_id, cap, "group exhausted: allocation cap reached");
            state.volunteer_state.exhausted.insert(group_id);
            continue;
        }

        let score = ranking::calculate_group_ranking_score(
            state,
            state.volunteer_state.group(group_id),
            criteria,
            target_frequency,
        );
        #[cfg(feature = "logging")]
        tracing::trace!(?group_id, score, "recomputed ranking score, re-inserting");
        insert_sorted(state, group_id, score, criteria, target_frequency);

        if all_shifts_full(state) {
            break;
        }
    }
}

/// Tie-break: lowest index wins, so ties only replace `best` on a strictly greater
/// affinity (§4.6, "Affinity ties during argmax resolve to the first shift...").
fn find_best_shift(
    state: &RotaState,
    group_id: GroupId,
    criteria: &[Box<dyn Criterion>],
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for shift_index in 0..state.shifts.len() {
        if !affinity::is_shift_valid_for_group(state, group_id, shift_index, criteria) {
            continue;
        }
        let score = affinity::calculate_shift_affinity(state, group_id, shift_index, criteria);
        best = match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((shift_index, score)),
        };
    }
    best.map(|(idx, _)| idx)
}

/// Mutates `state` to reflect `group_id` occupying `shift_index`: marks the group's
/// own allocation set, appends it to the shift, and fills the shift's team-lead/
/// male-count bookkeeping. Shared with `build_initial_state` for seeding pre-existing
/// assignments (§12).
pub(super) fn assign(state: &mut RotaState, group_id: GroupId, shift_index: usize) {
    let group_male_count = state.volunteer_state.group(group_id).male_count;
    let team_lead_id = if state.volunteer_state.group(group_id).has_team_lead {
        state
            .volunteer_state
            .group(group_id)
            .team_lead()
            .map(|v| v.id.clone())
    } else {
        None
    };

    state
        .volunteer_state
        .group_mut(group_id)
        .allocated_shift_indices
        .insert(shift_index);

    let shift = &mut state.shifts[shift_index];
    shift.allocated_groups.push(group_id);
    if shift.team_lead.is_none() {
        if let Some(lead_id) = team_lead_id {
            shift.team_lead = Some(lead_id);
        }
    }
    shift.male_count += group_male_count;
}

/// Re-inserts `group_id` at the first position whose neighbour's (recomputed) score
/// is strictly lower, so ties land after the equal-scored group — stable w.r.t. the
/// order it already had (§4.6).
fn insert_sorted(
    state: &mut RotaState,
    group_id: GroupId,
    score: f64,
    criteria: &[Box<dyn Criterion>],
    target_frequency: f64,
) {
    let existing = state.volunteer_state.ranking.clone();
    let mut position = existing.len();
    for (i, &other_id) in existing.iter().enumerate() {
        let other_score = ranking::calculate_group_ranking_score(
            state,
            state.volunteer_state.group(other_id),
            criteria,
            target_frequency,
        );
        if score > other_score {
            position = i;
            break;
        }
    }
    state.volunteer_state.ranking.insert(position, group_id);
}

fn all_shifts_full(state: &RotaState) -> bool {
    state.shifts.iter().all(|s| {
        s.closed || s.is_full(ordinary_allocated_count(state, s))
    })
}
