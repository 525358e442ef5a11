//! §4.5 — whether a group/shift pairing is admissible at all, and how well it fits.

use crate::criteria::Criterion;
use crate::ids::GroupId;
use crate::metrics::ordinary_allocated_count;
use crate::model::RotaState;

/// `false` if the shift is closed, outside availability, already allocated, full, or
/// any criterion vetoes the pairing.
pub fn is_shift_valid_for_group(
    state: &RotaState,
    group_id: GroupId,
    shift_index: usize,
    criteria: &[Box<dyn Criterion>],
) -> bool {
    let shift = &state.shifts[shift_index];
    let group = state.volunteer_state.group(group_id);

    if shift.closed {
        return false;
    }
    if !group.available_shift_indices.contains(&shift_index) {
        return false;
    }
    if group.allocated_shift_indices.contains(&shift_index) {
        return false;
    }
    if shift.is_full(ordinary_allocated_count(state, shift)) {
        return false;
    }
    criteria.iter().all(|c| c.is_shift_valid(state, group, shift))
}

/// `0` if not valid per above; otherwise the weighted sum of every criterion's
/// affinity contribution.
pub fn calculate_shift_affinity(
    state: &RotaState,
    group_id: GroupId,
    shift_index: usize,
    criteria: &[Box<dyn Criterion>],
) -> f64 {
    if !is_shift_valid_for_group(state, group_id, shift_index, criteria) {
        return 0.0;
    }
    let shift = &state.shifts[shift_index];
    let group = state.volunteer_state.group(group_id);
    criteria
        .iter()
        .map(|c| c.calculate_shift_affinity(state, group, shift) * c.affinity_weight())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn invalid_outside_availability() {
        let mut state = single_shift_state(1);
        let id = push_group(&mut state, couple_group("g", 1));
        assert!(!is_shift_valid_for_group(&state, id, 99, &[]));
    }

    #[test]
    fn valid_within_availability_and_capacity() {
        let mut state = single_shift_state(1);
        let id = push_group(&mut state, couple_group("g", 1));
        assert!(is_shift_valid_for_group(&state, id, 0, &[]));
    }

    #[test]
    fn invalid_once_full() {
        let mut state = single_shift_state(1);
        let id = push_group(&mut state, couple_group("g", 1));
        state.shifts[0].allocated_groups.push(id);
        state.volunteer_state.group_mut(id).allocated_shift_indices.insert(0);
        let other = push_group(&mut state, couple_group("h", 1));
        assert!(!is_shift_valid_for_group(&state, other, 0, &[]));
    }
}
