//! §4.3 — turns raw roster/availability/override input into the `VolunteerState` and
//! `Shift` list the ranking, affinity and main-loop modules operate on.

use super::AllocationError;
use crate::ids::{GroupId, GroupKey, VolunteerId};
use crate::model::{
    Gender, HistoricalShift, Shift, ShiftOverride, Volunteer, VolunteerAvailability,
    VolunteerGroup, VolunteerState,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Partitions volunteers into groups, resolves availability, and sorts the result by
/// `GroupKey` for determinism (§4.3 steps 1-7).
pub fn init_volunteer_groups(
    volunteers: &[Volunteer],
    availability: &[VolunteerAvailability],
    total_shifts: usize,
    historical_shifts: &[HistoricalShift],
) -> Result<VolunteerState, AllocationError> {
    let mut by_key: BTreeMap<GroupKey, Vec<Volunteer>> = BTreeMap::new();
    for volunteer in volunteers {
        by_key
            .entry(volunteer.effective_group_key())
            .or_default()
            .push(volunteer.clone());
    }

    let availability_by_id: HashMap<&VolunteerId, &VolunteerAvailability> = availability
        .iter()
        .map(|entry| (&entry.volunteer_id, entry))
        .collect();

    let mut groups = Vec::new();
    for (group_key, members) in by_key {
        let team_lead_count = members.iter().filter(|m| m.is_team_lead).count();
        if team_lead_count > 1 {
            return Err(AllocationError::MultipleTeamLeadsInGroup {
                group_key: group_key.as_str().to_string(),
            });
        }
        let has_team_lead = team_lead_count == 1;
        let male_count = members.iter().filter(|m| m.gender == Gender::Male).count();

        let mut responded = false;
        let mut unavailable: BTreeSet<usize> = BTreeSet::new();
        for member in &members {
            if let Some(response) = availability_by_id.get(&member.id) {
                if response.has_responded {
                    responded = true;
                    unavailable.extend(response.unavailable_shift_indices.iter().copied());
                }
            }
        }
        if !responded {
            continue;
        }

        let available_shift_indices: BTreeSet<usize> = (0..total_shifts)
            .filter(|i| !unavailable.contains(i))
            .collect();
        if available_shift_indices.is_empty() {
            continue;
        }

        let historical_allocation_count = historical_shifts
            .iter()
            .filter(|h| h.allocated_group_keys.contains(&group_key))
            .count();

        groups.push(VolunteerGroup {
            group_key,
            members,
            available_shift_indices,
            allocated_shift_indices: BTreeSet::new(),
            historical_allocation_count,
            has_team_lead,
            male_count,
        });
    }

    if groups.is_empty() {
        return Err(AllocationError::NoEligibleGroups);
    }

    // `BTreeMap` already iterated in ascending `GroupKey` order, so the arena index
    // order doubles as the determinism-pinning sort from §4.3 step 6.
    let ranking = (0..groups.len()).map(GroupId).collect();

    Ok(VolunteerState {
        groups,
        ranking,
        exhausted: BTreeSet::new(),
    })
}

/// Materializes one `Shift` per date, applying every matching override in the order
/// given (last write wins for `shift_size`; `custom_preallocations` accumulate; a
/// closure discards any pre-allocations accrued so far — §4.3 step 2).
pub fn init_shifts(
    dates: &[String],
    default_size: usize,
    overrides: &[ShiftOverride],
    volunteer_state: &VolunteerState,
) -> Vec<Shift> {
    dates
        .iter()
        .enumerate()
        .map(|(index, date)| {
            let mut size = default_size;
            let mut custom_preallocations = Vec::new();
            let mut closed = false;

            for ov in overrides {
                if !(ov.applies_to)(date) {
                    continue;
                }
                if let Some(s) = ov.shift_size {
                    size = s;
                }
                custom_preallocations.extend(ov.custom_preallocations.iter().cloned());
                if ov.closed {
                    closed = true;
                    custom_preallocations.clear();
                }
            }

            let available_groups = if closed {
                Vec::new()
            } else {
                volunteer_state
                    .groups
                    .iter()
                    .enumerate()
                    .filter(|(_, g)| g.available_shift_indices.contains(&index))
                    .map(|(gi, _)| GroupId(gi))
                    .collect()
            };

            Shift {
                date: date.clone(),
                index,
                size,
                closed,
                custom_preallocations,
                allocated_groups: Vec::new(),
                team_lead: None,
                male_count: 0,
                available_groups,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volunteer(id: &str, group_key: &str, gender: Gender, team_lead: bool) -> Volunteer {
        let mut v = Volunteer::new(VolunteerId::new(id), "F", "L", gender);
        v.group_key = GroupKey::new(group_key);
        v.is_team_lead = team_lead;
        v
    }

    fn responded(id: &str, unavailable: &[usize]) -> VolunteerAvailability {
        VolunteerAvailability {
            volunteer_id: VolunteerId::new(id),
            has_responded: true,
            unavailable_shift_indices: unavailable.iter().copied().collect(),
        }
    }

    #[test]
    fn groups_by_key_and_sorts_deterministically() {
        let volunteers = vec![
            volunteer("b1", "", Gender::Male, false),
            volunteer("a1", "", Gender::Female, false),
        ];
        let availability = vec![responded("a1", &[]), responded("b1", &[])];
        let state = init_volunteer_groups(&volunteers, &availability, 2, &[]).unwrap();
        let keys: Vec<_> = state
            .groups
            .iter()
            .map(|g| g.group_key.as_str().to_string())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn rejects_multiple_team_leads_in_one_group() {
        let volunteers = vec![
            volunteer("a", "couple", Gender::Male, true),
            volunteer("b", "couple", Gender::Female, true),
        ];
        let availability = vec![responded("a", &[]), responded("b", &[])];
        let err = init_volunteer_groups(&volunteers, &availability, 2, &[]).unwrap_err();
        assert!(matches!(err, AllocationError::MultipleTeamLeadsInGroup { .. }));
    }

    #[test]
    fn discards_non_responding_groups() {
        let volunteers = vec![volunteer("a", "", Gender::Unspecified, false)];
        let err = init_volunteer_groups(&volunteers, &[], 2, &[]).unwrap_err();
        assert!(matches!(err, AllocationError::NoEligibleGroups));
    }

    #[test]
    fn last_matching_override_wins_for_size_and_preallocations_accumulate() {
        let dates = vec!["2024-01-01".to_string()];
        let overrides = vec![
            ShiftOverride {
                applies_to: Box::new(|d: &str| d == "2024-01-01"),
                shift_size: Some(2),
                custom_preallocations: vec!["ext_1".to_string()],
                closed: false,
            },
            ShiftOverride {
                applies_to: Box::new(|d: &str| d == "2024-01-01"),
                shift_size: Some(5),
                custom_preallocations: vec!["ext_2".to_string()],
                closed: false,
            },
        ];
        let volunteer_state = VolunteerState {
            groups: Vec::new(),
            ranking: Vec::new(),
            exhausted: BTreeSet::new(),
        };
        let shifts = init_shifts(&dates, 1, &overrides, &volunteer_state);
        assert_eq!(shifts[0].size, 5);
        assert_eq!(
            shifts[0].custom_preallocations,
            vec!["ext_1".to_string(), "ext_2".to_string()]
        );
    }

    #[test]
    fn closed_override_clears_preallocations_and_availability() {
        let dates = vec!["2024-01-01".to_string()];
        let overrides = vec![ShiftOverride {
            applies_to: Box::new(|_: &str| true),
            shift_size: None,
            custom_preallocations: vec!["ext_1".to_string()],
            closed: true,
        }];
        let volunteer_state = VolunteerState {
            groups: Vec::new(),
            ranking: Vec::new(),
            exhausted: BTreeSet::new(),
        };
        let shifts = init_shifts(&dates, 1, &overrides, &volunteer_state);
        assert!(shifts[0].closed);
        assert!(shifts[0].custom_preallocations.is_empty());
        assert!(shifts[0].available_groups.is_empty());
    }
}
