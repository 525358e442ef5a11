//! The allocation engine's public surface: `AllocationConfig` in, `AllocationOutcome`
//! (wrapped in `Result`) out. Wires init → ranking → main loop → validator (§4, §6).

mod affinity;
mod init;
mod main_loop;
mod ranking;
mod validate;

use crate::criteria::Criterion;
use crate::ids::GroupId;
use crate::model::{
    AllocationOutcome, HistoricalShift, PreexistingAssignment, RankingWeights, RotaState,
    ShiftOverride, Volunteer, VolunteerAvailability,
};
use thiserror::Error;

/// Everything one allocation run needs. Corresponds to §6's `AllocationConfig`.
pub struct AllocationConfig {
    pub criteria: Vec<Box<dyn Criterion>>,
    pub max_allocation_frequency: f64,
    pub historical_shifts: Vec<HistoricalShift>,
    pub volunteers: Vec<Volunteer>,
    pub availability: Vec<VolunteerAvailability>,
    pub shift_dates: Vec<String>,
    pub default_shift_size: usize,
    pub overrides: Vec<ShiftOverride>,
    pub weights: RankingWeights,
    /// Shifts the caller has already populated — used by `validate_only` to check an
    /// already-populated scenario without running the greedy loop (§12).
    pub preexisting_assignments: Vec<PreexistingAssignment>,
}

/// Caller-bug / impossible-input errors (§7): these prevent any outcome at all,
/// distinct from the `ValidationErrors` an outcome can still carry on success.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("no shift dates supplied")]
    NoShiftDates,
    #[error("no volunteers supplied")]
    NoVolunteers,
    #[error("max allocation frequency {0} is outside (0, 1]")]
    InvalidMaxAllocationFrequency(f64),
    #[error("group {group_key} has more than one team lead")]
    MultipleTeamLeadsInGroup { group_key: String },
    #[error("no eligible volunteer groups after filtering for availability")]
    NoEligibleGroups,
}

fn build_initial_state(config: &AllocationConfig) -> Result<RotaState, AllocationError> {
    if config.shift_dates.is_empty() {
        return Err(AllocationError::NoShiftDates);
    }
    if config.volunteers.is_empty() {
        return Err(AllocationError::NoVolunteers);
    }
    if !(0.0 < config.max_allocation_frequency && config.max_allocation_frequency <= 1.0) {
        return Err(AllocationError::InvalidMaxAllocationFrequency(
            config.max_allocation_frequency,
        ));
    }

    let volunteer_state = init::init_volunteer_groups(
        &config.volunteers,
        &config.availability,
        config.shift_dates.len(),
        &config.historical_shifts,
    )?;
    let shifts = init::init_shifts(
        &config.shift_dates,
        config.default_shift_size,
        &config.overrides,
        &volunteer_state,
    );

    let mut state = RotaState {
        shifts,
        volunteer_state,
        historical_shifts: config.historical_shifts.clone(),
        max_allocation_frequency: config.max_allocation_frequency,
        weights: config.weights,
    };

    apply_preexisting_assignments(&mut state, &config.preexisting_assignments);

    Ok(state)
}

/// Seeds `state` with assignments the caller already made, using the same
/// bookkeeping `main_loop::assign` applies when it places a group itself. Unknown
/// dates or group keys are skipped rather than treated as hard errors, since a
/// scenario being re-validated may reference shifts or groups that fell out of the
/// current roster.
fn apply_preexisting_assignments(state: &mut RotaState, assignments: &[PreexistingAssignment]) {
    for assignment in assignments {
        let Some(shift_index) = state
            .shifts
            .iter()
            .position(|s| s.date == assignment.shift_date)
        else {
            continue;
        };
        for group_key in &assignment.allocated_group_keys {
            let Some(group_id) = state
                .volunteer_state
                .groups
                .iter()
                .position(|g| &g.group_key == group_key)
                .map(GroupId)
            else {
                continue;
            };
            main_loop::assign(state, group_id, shift_index);
        }
    }
}

/// Runs one allocation to completion. Mirrors §6's `Allocate(config) -> (Outcome, Error)`.
pub fn allocate(config: AllocationConfig) -> Result<AllocationOutcome, AllocationError> {
    let mut state = build_initial_state(&config)?;

    ranking::rank_volunteer_groups(&mut state, &config.criteria, config.max_allocation_frequency);
    main_loop::run(&mut state, &config.criteria, config.max_allocation_frequency);

    Ok(validate::build_outcome(state, &config.criteria))
}

/// Initializes and validates `config` without running the greedy loop — for a
/// scenario that already carries pre-existing assignments the caller only wants
/// checked (§12's `validate` subcommand).
pub fn validate_only(config: AllocationConfig) -> Result<AllocationOutcome, AllocationError> {
    let state = build_initial_state(&config)?;
    Ok(validate::build_outcome(state, &config.criteria))
}
