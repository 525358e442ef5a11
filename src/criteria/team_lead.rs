use super::{make_error, Criterion};
use crate::metrics::remaining_available_team_lead_groups;
use crate::model::{RotaState, Shift, ShiftValidationError, VolunteerGroup};

/// Vetoes a second team lead on one shift; strongly promotes lead-bearing groups so
/// they get first pick before ordinary groups crowd them out.
#[derive(Debug, Clone, Copy)]
pub struct TeamLead {
    group_weight: f64,
    affinity_weight: f64,
}

impl TeamLead {
    pub fn new(group_weight: f64, affinity_weight: f64) -> Self {
        Self {
            group_weight,
            affinity_weight,
        }
    }
}

impl Criterion for TeamLead {
    fn name(&self) -> &'static str {
        "TeamLead"
    }

    fn group_weight(&self) -> f64 {
        self.group_weight
    }

    fn affinity_weight(&self) -> f64 {
        self.affinity_weight
    }

    fn promote_volunteer_group(&self, _state: &RotaState, group: &VolunteerGroup) -> f64 {
        if group.has_team_lead {
            1.0
        } else {
            0.0
        }
    }

    fn is_shift_valid(&self, _state: &RotaState, group: &VolunteerGroup, shift: &Shift) -> bool {
        !(group.has_team_lead && shift.team_lead.is_some())
    }

    fn calculate_shift_affinity(
        &self,
        state: &RotaState,
        group: &VolunteerGroup,
        shift: &Shift,
    ) -> f64 {
        if !group.has_team_lead || shift.team_lead.is_some() {
            return 0.0;
        }
        let denom = remaining_available_team_lead_groups(state, shift);
        if denom == 0 {
            return 0.0;
        }
        1.0 / denom as f64
    }

    fn validate_rota_state(&self, state: &RotaState) -> Vec<ShiftValidationError> {
        state
            .shifts
            .iter()
            .filter(|s| !s.closed)
            .filter_map(|shift| match shift.team_lead {
                None => Some(make_error(
                    Some(shift),
                    self.name(),
                    "shift has no team lead assigned".to_string(),
                )),
                Some(_) => None,
            })
            .collect()
    }
}
