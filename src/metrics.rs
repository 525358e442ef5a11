//! Pure helper calculations shared by criteria, ranking and affinity (§4.2 "Definitions
//! used above"). Every function here only reads `RotaState`; none of them mutate it.

use crate::model::{RotaState, Shift, VolunteerGroup};

/// Ordinary (non-team-lead) members already allocated to this shift.
pub fn ordinary_allocated_count(state: &RotaState, shift: &Shift) -> usize {
    shift
        .allocated_groups
        .iter()
        .map(|&id| state.volunteer_state.group(id).ordinary_count())
        .sum()
}

/// `shift.Size - ordinariesAlreadyIn(AllocatedGroups) - |CustomPreallocations|`.
pub fn remaining_capacity(state: &RotaState, shift: &Shift) -> i64 {
    shift.remaining_capacity(ordinary_allocated_count(state, shift))
}

/// Groups still eligible to contribute to `shift`: available, not already allocated
/// here, and not exhausted. Shared by every "remainingAvailable*" denominator.
fn eligible_available_groups<'a>(
    state: &'a RotaState,
    shift: &'a Shift,
) -> impl Iterator<Item = &'a VolunteerGroup> + 'a {
    shift.available_groups.iter().filter_map(move |&id| {
        if shift.allocated_groups.contains(&id) || state.volunteer_state.is_exhausted(id) {
            None
        } else {
            Some(state.volunteer_state.group(id))
        }
    })
}

/// Sum of ordinary-member counts over groups eligible to fill `shift`, excluding
/// groups too large to fit in the remaining capacity (ShiftSize's own denominator).
pub fn remaining_available_ordinaries(state: &RotaState, shift: &Shift) -> usize {
    let capacity = remaining_capacity(state, shift).max(0) as usize;
    eligible_available_groups(state, shift)
        .map(|g| g.ordinary_count())
        .filter(|&count| count <= capacity)
        .sum()
}

/// Number of eligible groups that could still supply a team lead.
pub fn remaining_available_team_lead_groups(state: &RotaState, shift: &Shift) -> usize {
    eligible_available_groups(state, shift)
        .filter(|g| g.has_team_lead)
        .count()
}

/// Sum of male-member counts over groups still eligible to fill `shift`.
pub fn remaining_available_male_volunteers(state: &RotaState, shift: &Shift) -> usize {
    eligible_available_groups(state, shift)
        .map(|g| g.male_count)
        .sum()
}

