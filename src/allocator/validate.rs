//! §4.7 — post-allocation checks. `validate_core_invariants` covers the five
//! allocator-maintained properties; `build_outcome` folds those together with every
//! criterion's own `validate_rota_state` into the final `AllocationOutcome`.

use crate::criteria::Criterion;
use crate::metrics::ordinary_allocated_count;
use crate::model::{AllocationOutcome, RotaState, ShiftValidationError};
use std::collections::HashSet;

const CORE_INVARIANT: &str = "CoreInvariant";

pub fn build_outcome(state: RotaState, criteria: &[Box<dyn Criterion>]) -> AllocationOutcome {
    let mut validation_errors = validate_core_invariants(&state);
    for criterion in criteria {
        validation_errors.extend(criterion.validate_rota_state(&state));
    }
    let success = validation_errors.is_empty();
    #[cfg(feature = "logging")]
    if !success {
        tracing::warn!(count = validation_errors.len(), "allocation produced validation errors");
    }

    let max_allocation_count = state.max_allocation_count();
    let underutilized_groups = state
        .volunteer_state
        .groups
        .iter()
        .enumerate()
        .filter_map(|(idx, group)| {
            let allocated = group.allocated_shift_indices.len();
            let cap = group.available_shift_indices.len().min(max_allocation_count);
            (allocated > 0 && allocated < cap).then_some(crate::ids::GroupId(idx))
        })
        .collect();

    AllocationOutcome {
        state,
        success,
        underutilized_groups,
        validation_errors,
    }
}

fn validate_core_invariants(state: &RotaState) -> Vec<ShiftValidationError> {
    let mut errors = Vec::new();

    let max_allocation_count = state.max_allocation_count();
    for group in &state.volunteer_state.groups {
        if group.allocated_shift_indices.len() > max_allocation_count {
            errors.push(core_error(
                None,
                format!(
                    "group {} allocated {} shifts, exceeding the cap of {}",
                    group.group_key.as_str(),
                    group.allocated_shift_indices.len(),
                    max_allocation_count
                ),
            ));
        }
    }

    for shift in &state.shifts {
        let mut seen = HashSet::new();
        for &group_id in &shift.allocated_groups {
            let group_key = state.volunteer_state.group(group_id).group_key.clone();
            if !seen.insert(group_key.clone()) {
                errors.push(shift_error(
                    shift,
                    format!("group {} appears twice in shift {}", group_key.as_str(), shift.index),
                ));
            }
        }

        for &group_id in &shift.allocated_groups {
            let group = state.volunteer_state.group(group_id);
            if !group.available_shift_indices.contains(&shift.index) {
                errors.push(shift_error(
                    shift,
                    format!(
                        "group {} allocated to shift {} outside its availability",
                        group.group_key.as_str(),
                        shift.index
                    ),
                ));
            }
        }

        let ordinary = ordinary_allocated_count(state, shift);
        if ordinary + shift.custom_preallocations.len() > shift.size {
            errors.push(shift_error(
                shift,
                format!(
                    "shift {} over capacity: {} ordinary + {} preallocated > size {}",
                    shift.index,
                    ordinary,
                    shift.custom_preallocations.len(),
                    shift.size
                ),
            ));
        }

        if shift.closed
            && (!shift.allocated_groups.is_empty()
                || shift.team_lead.is_some()
                || !shift.custom_preallocations.is_empty())
        {
            errors.push(shift_error(
                shift,
                format!("shift {} is closed but carries allocations", shift.index),
            ));
        }
    }

    for (idx, group) in state.volunteer_state.groups.iter().enumerate() {
        let group_id = crate::ids::GroupId(idx);
        let derived: std::collections::BTreeSet<usize> = state
            .shifts
            .iter()
            .filter(|s| s.allocated_groups.contains(&group_id))
            .map(|s| s.index)
            .collect();
        if derived != group.allocated_shift_indices {
            errors.push(core_error(
                None,
                format!(
                    "group {}'s AllocatedShiftIndices disagrees with the shifts that list it",
                    group.group_key.as_str()
                ),
            ));
        }
    }

    for shift in &state.shifts {
        let declared: usize = shift
            .allocated_groups
            .iter()
            .map(|&id| state.volunteer_state.group(id).male_count)
            .sum();
        let team_lead_stand_alone_male = 0; // no path in this engine assigns a team lead outside a group
        let expected = declared + team_lead_stand_alone_male;
        if shift.male_count != expected {
            errors.push(shift_error(
                shift,
                format!(
                    "shift {} MaleCount {} disagrees with derived {}",
                    shift.index, shift.male_count, expected
                ),
            ));
        }
    }

    errors
}

fn core_error(shift: Option<&crate::model::Shift>, description: String) -> ShiftValidationError {
    ShiftValidationError {
        shift_index: shift.map(|s| s.index),
        shift_date: shift.map(|s| s.date.clone()),
        criterion_name: CORE_INVARIANT.to_string(),
        description,
    }
}

fn shift_error(shift: &crate::model::Shift, description: String) -> ShiftValidationError {
    core_error(Some(shift), description)
}
