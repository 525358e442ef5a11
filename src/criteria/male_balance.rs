use super::{make_error, Criterion};
use crate::metrics::{ordinary_allocated_count, remaining_available_male_volunteers};
use crate::model::{RotaState, Shift, ShiftValidationError, VolunteerGroup};

/// Vetoes a final, male-less group filling a shift that still has no male; otherwise
/// promotes male-carrying groups into shifts still short of one.
#[derive(Debug, Clone, Copy)]
pub struct MaleBalance {
    group_weight: f64,
    affinity_weight: f64,
}

impl MaleBalance {
    pub fn new(group_weight: f64, affinity_weight: f64) -> Self {
        Self {
            group_weight,
            affinity_weight,
        }
    }

    fn would_fill(state: &RotaState, group: &VolunteerGroup, shift: &Shift) -> bool {
        let ordinary_after = ordinary_allocated_count(state, shift) + group.ordinary_count();
        shift.is_full(ordinary_after)
    }
}

impl Criterion for MaleBalance {
    fn name(&self) -> &'static str {
        "MaleBalance"
    }

    fn group_weight(&self) -> f64 {
        self.group_weight
    }

    fn affinity_weight(&self) -> f64 {
        self.affinity_weight
    }

    fn promote_volunteer_group(&self, _state: &RotaState, group: &VolunteerGroup) -> f64 {
        if group.male_count > 0 {
            1.0
        } else {
            0.0
        }
    }

    fn is_shift_valid(&self, state: &RotaState, group: &VolunteerGroup, shift: &Shift) -> bool {
        let shift_has_no_male = shift.male_count == 0;
        let group_has_no_male = group.male_count == 0;
        !(shift_has_no_male && group_has_no_male && Self::would_fill(state, group, shift))
    }

    fn calculate_shift_affinity(
        &self,
        state: &RotaState,
        group: &VolunteerGroup,
        shift: &Shift,
    ) -> f64 {
        if group.male_count == 0 {
            return 0.0;
        }
        let denom = remaining_available_male_volunteers(state, shift);
        if denom == 0 {
            return 0.0;
        }
        let need = (1.0 - 0.5 * shift.male_count as f64).max(0.1);
        need / denom as f64
    }

    fn validate_rota_state(&self, state: &RotaState) -> Vec<ShiftValidationError> {
        state
            .shifts
            .iter()
            .filter(|s| !s.closed)
            .filter_map(|shift| {
                if shift.male_count == 0 {
                    Some(make_error(
                        Some(shift),
                        self.name(),
                        "shift has no male volunteer".to_string(),
                    ))
                } else {
                    None
                }
            })
            .collect()
    }
}
