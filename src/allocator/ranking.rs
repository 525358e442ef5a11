//! §4.4 — the ranking score that orders the group pool, and the sort that applies it.

use crate::criteria::Criterion;
use crate::model::{RotaState, VolunteerGroup};

/// Higher score ⇒ higher priority to be popped next by the main loop.
pub fn calculate_group_ranking_score(
    state: &RotaState,
    group: &VolunteerGroup,
    criteria: &[Box<dyn Criterion>],
    target_frequency: f64,
) -> f64 {
    let mut score = 0.0;

    let remaining_availability = group.remaining_availability();
    if remaining_availability > 0 {
        let target = (state.shifts.len() as f64 * target_frequency).floor();
        let need = target - group.allocated_shift_indices.len() as f64;
        let urgency = (need / remaining_availability as f64).max(1.0);
        score += urgency * state.weights.current_rota_urgency;
    }

    if !state.shifts.is_empty() {
        let desired_total =
            ((state.historical_shifts.len() + state.shifts.len()) as f64 * target_frequency)
                .floor();
        let desired = desired_total
            - group.historical_allocation_count as f64
            - group.allocated_shift_indices.len() as f64;
        let fairness = (desired / state.shifts.len() as f64).clamp(-1.0, 1.0);
        score += fairness * state.weights.overall_frequency_fairness;
    }

    if group.members.len() > 1 {
        score += state.weights.promote_group;
    }

    for criterion in criteria {
        score += criterion.promote_volunteer_group(state, group) * criterion.group_weight();
    }

    score
}

/// Sorts the ranked pool descending by score; ties keep their previous relative
/// order (Rust's `sort_by` is stable).
pub fn rank_volunteer_groups(
    state: &mut RotaState,
    criteria: &[Box<dyn Criterion>],
    target_frequency: f64,
) {
    let mut scored: Vec<_> = state
        .volunteer_state
        .ranking
        .iter()
        .map(|&id| {
            let score = calculate_group_ranking_score(
                state,
                state.volunteer_state.group(id),
                criteria,
                target_frequency,
            );
            (id, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    state.volunteer_state.ranking = scored.into_iter().map(|(id, _)| id).collect();
}
