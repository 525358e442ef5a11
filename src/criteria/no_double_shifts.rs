use super::{make_error, Criterion};
use crate::model::{RotaState, Shift, ShiftValidationError, VolunteerGroup};

/// Vetoes assigning a group to shifts adjacent to one it already holds, including the
/// boundary against the last historical shift for index 0.
#[derive(Debug, Clone, Copy)]
pub struct NoDoubleShifts {
    group_weight: f64,
    affinity_weight: f64,
}

impl NoDoubleShifts {
    pub fn new(group_weight: f64, affinity_weight: f64) -> Self {
        Self {
            group_weight,
            affinity_weight,
        }
    }
}

impl Criterion for NoDoubleShifts {
    fn name(&self) -> &'static str {
        "NoDoubleShifts"
    }

    fn group_weight(&self) -> f64 {
        self.group_weight
    }

    fn affinity_weight(&self) -> f64 {
        self.affinity_weight
    }

    fn promote_volunteer_group(&self, _state: &RotaState, _group: &VolunteerGroup) -> f64 {
        0.0
    }

    fn is_shift_valid(&self, state: &RotaState, group: &VolunteerGroup, shift: &Shift) -> bool {
        let adjacent_to_existing = group
            .allocated_shift_indices
            .iter()
            .any(|&i| i.abs_diff(shift.index) == 1);
        if adjacent_to_existing {
            return false;
        }
        if shift.index == 0 {
            if let Some(last) = state.last_historical_shift() {
                if last.allocated_group_keys.contains(&group.group_key) {
                    return false;
                }
            }
        }
        true
    }

    fn calculate_shift_affinity(
        &self,
        state: &RotaState,
        group: &VolunteerGroup,
        shift: &Shift,
    ) -> f64 {
        let valid_indices: Vec<usize> = state
            .shifts
            .iter()
            .filter(|s| self.is_shift_valid(state, group, s))
            .map(|s| s.index)
            .collect();
        if valid_indices.is_empty() {
            return 0.0;
        }
        let remaining = valid_indices
            .iter()
            .filter(|&&idx| idx == shift.index || idx.abs_diff(shift.index) != 1)
            .count();
        remaining as f64 / valid_indices.len() as f64
    }

    fn validate_rota_state(&self, state: &RotaState) -> Vec<ShiftValidationError> {
        let mut errors = Vec::new();
        for window in state.shifts.windows(2) {
            let [a, b] = window else { continue };
            for &group_id in &a.allocated_groups {
                if b.allocated_groups.contains(&group_id) {
                    let key = state.volunteer_state.group(group_id).group_key.as_str();
                    errors.push(make_error(
                        Some(b),
                        self.name(),
                        format!("group {key} is allocated to adjacent shifts {} and {}", a.index, b.index),
                    ));
                }
            }
        }
        if let (Some(first), Some(last_historical)) =
            (state.shifts.first(), state.last_historical_shift())
        {
            for &group_id in &first.allocated_groups {
                let key = state.volunteer_state.group(group_id).group_key.clone();
                if last_historical.allocated_group_keys.contains(&key) {
                    errors.push(make_error(
                        Some(first),
                        self.name(),
                        format!(
                            "group {} is allocated to shift 0 and the last historical shift",
                            key.as_str()
                        ),
                    ));
                }
            }
        }
        errors
    }
}
