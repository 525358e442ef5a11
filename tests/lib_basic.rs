#![forbid(unsafe_code)]
use rota_allocator::{
    allocate, criteria::default_criteria, validate_only, AllocationConfig, AllocationError,
    Gender, GroupKey, HistoricalShift, PreexistingAssignment, RankingWeights, Volunteer,
    VolunteerAvailability, VolunteerId,
};

fn responded(id: &str, unavailable: &[usize]) -> VolunteerAvailability {
    VolunteerAvailability {
        volunteer_id: VolunteerId::new(id),
        has_responded: true,
        unavailable_shift_indices: unavailable.iter().copied().collect(),
    }
}

fn dates(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("2024-01-{:02}", i + 1)).collect()
}

fn base_config() -> AllocationConfig {
    AllocationConfig {
        criteria: default_criteria(),
        max_allocation_frequency: 1.0,
        historical_shifts: Vec::new(),
        volunteers: Vec::new(),
        availability: Vec::new(),
        shift_dates: Vec::new(),
        default_shift_size: 1,
        overrides: Vec::new(),
        weights: RankingWeights::default(),
        preexisting_assignments: Vec::new(),
    }
}

#[test]
fn scenario_1_trivial_success() {
    // Two shifts, size 1, each needing one team lead and one male ordinary. Two team
    // leads and two male ordinaries are available so `NoDoubleShifts` never forces a
    // shift to go without one (a single lead/single male pair can only cover one of
    // the two adjacent shifts — see `NoDoubleShifts`'s own tests for that boundary).
    let mut lead_1 = Volunteer::new(VolunteerId::new("lead1"), "Alice", "A", Gender::Female);
    lead_1.is_team_lead = true;
    let mut lead_2 = Volunteer::new(VolunteerId::new("lead2"), "Amara", "A", Gender::Female);
    lead_2.is_team_lead = true;
    let male_1 = Volunteer::new(VolunteerId::new("male1"), "Bob", "B", Gender::Male);
    let male_2 = Volunteer::new(VolunteerId::new("male2"), "Ben", "B", Gender::Male);

    let config = AllocationConfig {
        shift_dates: dates(2),
        volunteers: vec![lead_1, lead_2, male_1, male_2],
        availability: vec![
            responded("lead1", &[]),
            responded("lead2", &[]),
            responded("male1", &[]),
            responded("male2", &[]),
        ],
        ..base_config()
    };

    let outcome = allocate(config).unwrap();
    assert!(outcome.success, "{:?}", outcome.validation_errors);
    for shift in &outcome.state.shifts {
        // A team lead group contributes no ordinary members, so it rides alongside
        // the one ordinary (male) group a size-1 shift still has room for.
        assert_eq!(shift.allocated_groups.len(), 2);
        assert!(shift.team_lead.is_some());
        assert!(shift.male_count >= 1);
    }
}

#[test]
fn scenario_2_unfillable_reports_validation_errors() {
    let mut alice = Volunteer::new(VolunteerId::new("alice"), "Alice", "A", Gender::Female);
    alice.is_team_lead = true;
    let bob = Volunteer::new(VolunteerId::new("bob"), "Bob", "B", Gender::Male);
    let c1 = Volunteer::new(VolunteerId::new("c1"), "Carol1", "C", Gender::Female);
    let c2 = Volunteer::new(VolunteerId::new("c2"), "Carol2", "C", Gender::Female);
    let c3 = Volunteer::new(VolunteerId::new("c3"), "Carol3", "C", Gender::Female);

    let config = AllocationConfig {
        shift_dates: dates(3),
        default_shift_size: 2,
        volunteers: vec![alice, bob, c1, c2, c3],
        availability: vec![
            responded("alice", &[1, 2]),
            responded("bob", &[0, 2]),
            responded("c1", &[0, 1]),
            responded("c2", &[0, 1]),
            responded("c3", &[0, 1]),
        ],
        ..base_config()
    };

    let outcome = allocate(config).unwrap();
    assert!(!outcome.success);
    assert!(outcome.validation_errors.iter().any(|e| e.criterion_name == "TeamLead"));
    assert!(outcome.validation_errors.iter().any(|e| e.criterion_name == "MaleBalance"));
    assert!(outcome.validation_errors.iter().any(|e| e.criterion_name == "ShiftSize"));
}

#[test]
fn scenario_3_double_shift_across_history_boundary() {
    let mut a = Volunteer::new(VolunteerId::new("a"), "A", "A", Gender::Unspecified);
    a.group_key = rota_allocator::GroupKey::new("alice_bob");
    let mut b = Volunteer::new(VolunteerId::new("b"), "B", "B", Gender::Unspecified);
    b.group_key = rota_allocator::GroupKey::new("alice_bob");

    // Only `ShiftSize` and `NoDoubleShifts` are in play here: neither volunteer is a
    // team lead or male, so the full default criteria set would also flag the
    // (expected, and orthogonal) absence of a lead/male on every shift.
    use rota_allocator::{NoDoubleShifts, ShiftSize};
    let config = AllocationConfig {
        shift_dates: dates(2),
        criteria: vec![Box::new(ShiftSize::new(1.0, 1.0)), Box::new(NoDoubleShifts::new(1.0, 1.0))],
        historical_shifts: vec![HistoricalShift {
            date: "2024-01-25".to_string(),
            allocated_group_keys: vec![rota_allocator::GroupKey::new("alice_bob")],
        }],
        volunteers: vec![a, b],
        availability: vec![responded("a", &[]), responded("b", &[])],
        default_shift_size: 2,
        ..base_config()
    };

    let outcome = allocate(config).unwrap();
    assert!(outcome.success, "{:?}", outcome.validation_errors);
    assert!(outcome.state.shifts[0].allocated_groups.is_empty());
    assert!(!outcome.state.shifts[1].allocated_groups.is_empty());
}

#[test]
fn scenario_4_closed_shift_respected() {
    let volunteers: Vec<_> = (0..3)
        .map(|i| Volunteer::new(VolunteerId::new(format!("v{i}")), "F", "L", Gender::Unspecified))
        .collect();
    let availability: Vec<_> = volunteers
        .iter()
        .map(|v| responded(v.id.as_str(), &[]))
        .collect();

    let config = AllocationConfig {
        shift_dates: dates(5),
        volunteers,
        availability,
        overrides: vec![rota_allocator::ShiftOverride {
            applies_to: Box::new(|d: &str| d == "2024-01-03"),
            shift_size: None,
            custom_preallocations: Vec::new(),
            closed: true,
        }],
        ..base_config()
    };

    let outcome = allocate(config).unwrap();
    let closed = &outcome.state.shifts[2];
    assert!(closed.closed);
    assert!(closed.allocated_groups.is_empty());
    assert!(closed.available_groups.is_empty());
    assert!(!outcome
        .validation_errors
        .iter()
        .any(|e| e.shift_index == Some(2)));
}

#[test]
fn scenario_5_frequency_cap() {
    let v = Volunteer::new(VolunteerId::new("v"), "F", "L", Gender::Unspecified);
    let config = AllocationConfig {
        shift_dates: dates(7),
        max_allocation_frequency: 0.33,
        volunteers: vec![v],
        availability: vec![responded("v", &[])],
        ..base_config()
    };

    let outcome = allocate(config).unwrap();
    assert_eq!(outcome.state.volunteer_state.groups.len(), 1);
    assert!(outcome.state.volunteer_state.groups[0].allocated_shift_indices.len() <= 2);
}

#[test]
fn scenario_6_preallocation_arithmetic() {
    let volunteers: Vec<_> = (0..3)
        .map(|i| Volunteer::new(VolunteerId::new(format!("v{i}")), "F", "L", Gender::Unspecified))
        .collect();
    let availability: Vec<_> = volunteers
        .iter()
        .map(|v| responded(v.id.as_str(), &[]))
        .collect();

    let config = AllocationConfig {
        shift_dates: dates(1),
        default_shift_size: 3,
        volunteers,
        availability,
        overrides: vec![rota_allocator::ShiftOverride {
            applies_to: Box::new(|d: &str| d == "2024-01-01"),
            shift_size: None,
            custom_preallocations: vec!["external_1".to_string(), "external_2".to_string()],
            closed: false,
        }],
        ..base_config()
    };

    let outcome = allocate(config).unwrap();
    let shift = &outcome.state.shifts[0];
    assert_eq!(shift.custom_preallocations, vec!["external_1", "external_2"]);
    let ordinary: usize = shift
        .allocated_groups
        .iter()
        .map(|&id| outcome.state.volunteer_state.group(id).ordinary_count())
        .sum();
    assert_eq!(ordinary + shift.custom_preallocations.len(), 3);
}

#[test]
fn validate_only_checks_preexisting_assignments() {
    let mut lead = Volunteer::new(VolunteerId::new("lead"), "Alice", "A", Gender::Female);
    lead.is_team_lead = true;
    lead.group_key = GroupKey::new("lead_group");
    let mut male = Volunteer::new(VolunteerId::new("male"), "Bob", "B", Gender::Male);
    male.group_key = GroupKey::new("male_group");

    let config = AllocationConfig {
        shift_dates: dates(1),
        volunteers: vec![lead, male],
        availability: vec![responded("lead", &[]), responded("male", &[])],
        default_shift_size: 1,
        preexisting_assignments: vec![PreexistingAssignment {
            shift_date: "2024-01-01".to_string(),
            allocated_group_keys: vec![GroupKey::new("lead_group"), GroupKey::new("male_group")],
        }],
        ..base_config()
    };

    let outcome = validate_only(config).unwrap();
    assert!(outcome.success, "{:?}", outcome.validation_errors);
    let shift = &outcome.state.shifts[0];
    assert_eq!(shift.allocated_groups.len(), 2);
    assert!(shift.team_lead.is_some());
    assert_eq!(shift.male_count, 1);
}

#[test]
fn rejects_empty_shift_dates() {
    let config = AllocationConfig {
        volunteers: vec![Volunteer::new(VolunteerId::new("a"), "A", "A", Gender::Unspecified)],
        ..base_config()
    };
    assert!(matches!(allocate(config), Err(AllocationError::NoShiftDates)));
}

#[test]
fn rejects_invalid_max_allocation_frequency() {
    let config = AllocationConfig {
        shift_dates: dates(1),
        volunteers: vec![Volunteer::new(VolunteerId::new("a"), "A", "A", Gender::Unspecified)],
        max_allocation_frequency: 1.5,
        ..base_config()
    };
    assert!(matches!(
        allocate(config),
        Err(AllocationError::InvalidMaxAllocationFrequency(_))
    ));
}
