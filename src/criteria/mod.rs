//! The criterion capability (§4.1): a pluggable policy unit exposing ranking
//! promotion, hard-validity veto, soft affinity, and a structural validation pass.
//!
//! Adding a criterion means adding one `impl Criterion`; nothing in `crate::allocator`
//! needs to change (§9, "Criterion as capability, not inheritance").

mod male_balance;
mod no_double_shifts;
mod shift_size;
mod shift_spread;
mod team_lead;

pub use male_balance::MaleBalance;
pub use no_double_shifts::NoDoubleShifts;
pub use shift_size::ShiftSize;
pub use shift_spread::ShiftSpread;
pub use team_lead::TeamLead;

use crate::model::{RotaState, Shift, ShiftValidationError, VolunteerGroup};

/// A self-contained allocation policy plug-in. Every method is pure with respect to
/// `state`: criteria read, never mutate, and must tolerate being asked about a shift
/// they would otherwise veto (affinity returns 0 defensively rather than panicking).
pub trait Criterion: std::fmt::Debug {
    /// Stable identifier used in validation errors.
    fn name(&self) -> &'static str;

    fn group_weight(&self) -> f64;

    fn affinity_weight(&self) -> f64;

    /// Contribution to a group's ranking score, in `[-1, 1]`.
    fn promote_volunteer_group(&self, state: &RotaState, group: &VolunteerGroup) -> f64;

    /// Hard constraint: `false` vetoes the pairing outright.
    fn is_shift_valid(&self, state: &RotaState, group: &VolunteerGroup, shift: &Shift) -> bool;

    /// Soft preference, in `[0, 1]`.
    fn calculate_shift_affinity(
        &self,
        state: &RotaState,
        group: &VolunteerGroup,
        shift: &Shift,
    ) -> f64;

    /// Post-allocation structural check; never panics, never mutates.
    fn validate_rota_state(&self, state: &RotaState) -> Vec<ShiftValidationError>;
}

/// The five built-in criteria, each with equal group/affinity weight of 1.0 — the
/// configuration used throughout this crate's own tests and the CLI's default scenario.
pub fn default_criteria() -> Vec<Box<dyn Criterion>> {
    vec![
        Box::new(ShiftSize::new(1.0, 1.0)),
        Box::new(TeamLead::new(1.0, 1.0)),
        Box::new(MaleBalance::new(1.0, 1.0)),
        Box::new(NoDoubleShifts::new(1.0, 1.0)),
        Box::new(ShiftSpread::new(1.0, 1.0)),
    ]
}

fn validation_error(
    shift: Option<&Shift>,
    criterion_name: &str,
    description: String,
) -> ShiftValidationError {
    ShiftValidationError {
        shift_index: shift.map(|s| s.index),
        shift_date: shift.map(|s| s.date.clone()),
        criterion_name: criterion_name.to_string(),
        description,
    }
}

pub(crate) use validation_error as make_error;
