use super::{make_error, Criterion};
use crate::metrics::{ordinary_allocated_count, remaining_available_ordinaries, remaining_capacity};
use crate::model::{RotaState, Shift, ShiftValidationError, VolunteerGroup};

/// Vetoes groups too large for the remaining capacity; prefers shifts with more
/// slack relative to the pool of ordinary volunteers still able to fill them.
#[derive(Debug, Clone, Copy)]
pub struct ShiftSize {
    group_weight: f64,
    affinity_weight: f64,
}

impl ShiftSize {
    pub fn new(group_weight: f64, affinity_weight: f64) -> Self {
        Self {
            group_weight,
            affinity_weight,
        }
    }
}

impl Criterion for ShiftSize {
    fn name(&self) -> &'static str {
        "ShiftSize"
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
        (group.ordinary_count() as i64) <= remaining_capacity(state, shift)
    }

    fn calculate_shift_affinity(
        &self,
        state: &RotaState,
        group: &VolunteerGroup,
        shift: &Shift,
    ) -> f64 {
        if group.ordinary_count() == 0 {
            return 0.0;
        }
        let denom = remaining_available_ordinaries(state, shift);
        if denom == 0 {
            return 0.0;
        }
        let capacity = remaining_capacity(state, shift).max(0) as f64;
        (capacity / denom as f64).clamp(0.0, 1.0)
    }

    fn validate_rota_state(&self, state: &RotaState) -> Vec<ShiftValidationError> {
        state
            .shifts
            .iter()
            .filter(|s| !s.closed)
            .filter_map(|shift| {
                let current = ordinary_allocated_count(state, shift) + shift.custom_preallocations.len();
                if current != shift.size {
                    Some(make_error(
                        Some(shift),
                        self.name(),
                        format!(
                            "shift filled with {current} ordinary volunteer(s), expected {}",
                            shift.size
                        ),
                    ))
                } else {
                    None
                }
            })
            .collect()
    }
}
