use super::Criterion;
use crate::model::{RotaState, Shift, ShiftValidationError, VolunteerGroup};

/// Never vetoes; prefers shifts further (in index distance) from ones the group
/// already holds or held historically, spreading allocations out rather than
/// clustering them.
#[derive(Debug, Clone, Copy)]
pub struct ShiftSpread {
    group_weight: f64,
    affinity_weight: f64,
}

impl ShiftSpread {
    pub fn new(group_weight: f64, affinity_weight: f64) -> Self {
        Self {
            group_weight,
            affinity_weight,
        }
    }

    /// Virtual index for the `p`-th (0-based) historical shift, placed immediately
    /// before the current rota's index 0: the most recent historical shift is `-1`.
    fn historical_virtual_index(total_historical: usize, position: usize) -> isize {
        position as isize - total_historical as isize
    }

    fn reference_distance(state: &RotaState, group: &VolunteerGroup, candidate_index: usize) -> Option<usize> {
        let candidate = candidate_index as isize;
        let from_current = group
            .allocated_shift_indices
            .iter()
            .map(|&i| (i as isize - candidate).unsigned_abs());
        let total_historical = state.historical_shifts.len();
        let from_history = state
            .historical_shifts
            .iter()
            .enumerate()
            .filter(|(_, h)| h.allocated_group_keys.contains(&group.group_key))
            .map(move |(p, _)| {
                (Self::historical_virtual_index(total_historical, p) - candidate).unsigned_abs()
            });
        from_current.chain(from_history).min()
    }
}

impl Criterion for ShiftSpread {
    fn name(&self) -> &'static str {
        "ShiftSpread"
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

    fn is_shift_valid(&self, _state: &RotaState, _group: &VolunteerGroup, _shift: &Shift) -> bool {
        true
    }

    fn calculate_shift_affinity(
        &self,
        state: &RotaState,
        group: &VolunteerGroup,
        shift: &Shift,
    ) -> f64 {
        match Self::reference_distance(state, group, shift.index) {
            None => 0.5,
            Some(distance) => {
                let max_possible = (state.historical_shifts.len() + state.shifts.len())
                    .saturating_sub(1)
                    .max(1);
                (distance as f64 / max_possible as f64).clamp(0.0, 1.0)
            }
        }
    }

    fn validate_rota_state(&self, _state: &RotaState) -> Vec<ShiftValidationError> {
        Vec::new()
    }
}
