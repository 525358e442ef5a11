//! Shared fixtures for unit tests across `criteria` and `allocator`. Not compiled into
//! release builds.

use crate::ids::{GroupId, GroupKey, VolunteerId};
use crate::model::{
    Gender, HistoricalShift, RankingWeights, RotaState, Shift, Volunteer, VolunteerGroup,
    VolunteerState,
};

/// A one-shift rota with an empty group pool, ready for criteria unit tests to push
/// groups into directly.
pub fn single_shift_state(size: usize) -> RotaState {
    multi_shift_state(&[size])
}

pub fn multi_shift_state(sizes: &[usize]) -> RotaState {
    let shifts = sizes
        .iter()
        .enumerate()
        .map(|(i, &size)| Shift {
            date: format!("test-day-{i}"),
            index: i,
            size,
            closed: false,
            custom_preallocations: Vec::new(),
            allocated_groups: Vec::new(),
            team_lead: None,
            male_count: 0,
            available_groups: Vec::new(),
        })
        .collect();

    RotaState {
        shifts,
        volunteer_state: VolunteerState {
            groups: Vec::new(),
            ranking: Vec::new(),
            exhausted: Default::default(),
        },
        historical_shifts: Vec::new(),
        max_allocation_frequency: 1.0,
        weights: RankingWeights::default(),
    }
}

pub fn historical(date: &str, group_keys: &[&str]) -> HistoricalShift {
    HistoricalShift {
        date: date.to_string(),
        allocated_group_keys: group_keys.iter().map(|k| GroupKey::new(*k)).collect(),
    }
}

/// A group of `member_count` ordinary (non-lead, non-male) volunteers available for
/// shift index 0 only, unless the caller mutates `available_shift_indices` after.
pub fn couple_group(key: &str, member_count: usize) -> VolunteerGroup {
    let members = (0..member_count)
        .map(|i| {
            Volunteer::new(
                VolunteerId::new(format!("{key}_{i}")),
                "First",
                "Last",
                Gender::Unspecified,
            )
        })
        .collect();
    VolunteerGroup {
        group_key: GroupKey::new(key),
        members,
        available_shift_indices: [0].into_iter().collect(),
        allocated_shift_indices: Default::default(),
        historical_allocation_count: 0,
        has_team_lead: false,
        male_count: 0,
    }
}

/// Pushes `group` into `state`'s arena and registers its available shifts on every
/// shift it names, mirroring what `init::init_shifts` would have done.
pub fn push_group(state: &mut RotaState, group: VolunteerGroup) -> GroupId {
    let id = GroupId(state.volunteer_state.groups.len());
    for &idx in &group.available_shift_indices {
        if let Some(shift) = state.shifts.get_mut(idx) {
            shift.available_groups.push(id);
        }
    }
    state.volunteer_state.groups.push(group);
    state.volunteer_state.ranking.push(id);
    id
}
