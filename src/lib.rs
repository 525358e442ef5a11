#![forbid(unsafe_code)]
//! rota-allocator — a local, no-database volunteer rota allocation engine.
//!
//! - Pluggable criteria (shift size, team lead, gender balance, double-shift
//!   avoidance, shift spread) scored through one `Criterion` trait.
//! - Greedy, deterministic main loop: stable sort, stable re-insertion, lowest-index
//!   tie-break.
//! - File-based scenario import and rota export (JSON/CSV); no database.

pub mod allocator;
pub mod criteria;
pub mod ids;
pub mod io;
pub mod metrics;
pub mod model;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use allocator::{allocate, validate_only, AllocationConfig, AllocationError};
pub use criteria::{default_criteria, Criterion, MaleBalance, NoDoubleShifts, ShiftSize, ShiftSpread, TeamLead};
pub use ids::{GroupId, GroupKey, VolunteerId};
pub use io::{load_scenario_json, Scenario, ScenarioAssignment, ScenarioOverride};
pub use model::{
    AllocationOutcome, Gender, HistoricalShift, PreexistingAssignment, RankingWeights, RotaState,
    Shift, ShiftOverride, ShiftValidationError, Volunteer, VolunteerAvailability, VolunteerGroup,
    VolunteerState,
};
pub use storage::{JsonStorage, Storage};
