//! Entity layer: plain value records for volunteers, groups, shifts and rota state.
//!
//! Nothing in this module runs allocation logic; it only defines the shapes the
//! criteria (`crate::criteria`) and allocator (`crate::allocator`) read and mutate.

use crate::ids::{GroupId, GroupKey, VolunteerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Gender is carried purely to satisfy the `MaleBalance` criterion; swapping in a
/// different demographic axis means adding a variant here and a new criterion, not
/// touching the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

/// A single roster member. Immutable for the duration of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: VolunteerId,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub is_team_lead: bool,
    /// Empty denotes an individual; non-empty groups this volunteer with everyone
    /// sharing the same key (a couple or family).
    #[serde(default)]
    pub group_key: GroupKey,
}

impl Volunteer {
    pub fn new<F: Into<String>, L: Into<String>>(
        id: VolunteerId,
        first_name: F,
        last_name: L,
        gender: Gender,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
            is_team_lead: false,
            group_key: GroupKey::new(""),
        }
    }

    /// The group key this volunteer resolves to: their own key if set, otherwise the
    /// synthesised individual key (§4.3 step 1).
    pub fn effective_group_key(&self) -> GroupKey {
        if self.group_key.is_empty() {
            GroupKey::individual(&self.id)
        } else {
            self.group_key.clone()
        }
    }
}

/// One volunteer's response to the availability form for the current rota.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerAvailability {
    pub volunteer_id: VolunteerId,
    pub has_responded: bool,
    #[serde(default)]
    pub unavailable_shift_indices: BTreeSet<usize>,
}

/// A co-allocatable unit: a single volunteer or a family/couple sharing a group key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerGroup {
    pub group_key: GroupKey,
    pub members: Vec<Volunteer>,
    pub available_shift_indices: BTreeSet<usize>,
    pub allocated_shift_indices: BTreeSet<usize>,
    pub historical_allocation_count: usize,
    pub has_team_lead: bool,
    pub male_count: usize,
}

impl VolunteerGroup {
    /// Members who are not the team lead; team leads never consume ordinary capacity.
    pub fn ordinary_count(&self) -> usize {
        self.members.iter().filter(|m| !m.is_team_lead).count()
    }

    pub fn team_lead(&self) -> Option<&Volunteer> {
        self.members.iter().find(|m| m.is_team_lead)
    }

    pub fn remaining_availability(&self) -> usize {
        self.available_shift_indices
            .difference(&self.allocated_shift_indices)
            .count()
    }
}

/// A single weekly assignment slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub date: String,
    pub index: usize,
    pub size: usize,
    pub closed: bool,
    pub custom_preallocations: Vec<String>,
    pub allocated_groups: Vec<GroupId>,
    pub team_lead: Option<VolunteerId>,
    pub male_count: usize,
    pub available_groups: Vec<GroupId>,
}

impl Shift {
    /// `true` once ordinary capacity is exhausted; the team-lead slot is independent
    /// (§4.5) so an unfilled lead slot never makes a shift "full" on its own.
    pub fn is_full(&self, ordinary_allocated: usize) -> bool {
        ordinary_allocated + self.custom_preallocations.len() >= self.size
    }

    pub fn remaining_capacity(&self, ordinary_allocated: usize) -> i64 {
        self.size as i64 - ordinary_allocated as i64 - self.custom_preallocations.len() as i64
    }
}

/// A prior rota's shift, reduced to the two fields the engine still needs: when it
/// happened, and which groups (by key) were in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalShift {
    pub date: String,
    pub allocated_group_keys: Vec<GroupKey>,
}

/// A shift a caller has already populated (e.g. a scenario the `validate` subcommand
/// is re-checking): which date it is, and which groups were already put on it. Team
/// lead and male count are derived from those groups rather than carried separately,
/// the same way the main loop derives them when it assigns a group to a shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreexistingAssignment {
    pub shift_date: String,
    pub allocated_group_keys: Vec<GroupKey>,
}

/// Weights feeding `calculate_group_ranking_score` (§4.4). Default to 1.0, matching the
/// spec's "optional; default 1" for ranking weights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankingWeights {
    pub current_rota_urgency: f64,
    pub overall_frequency_fairness: f64,
    pub promote_group: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            current_rota_urgency: 1.0,
            overall_frequency_fairness: 1.0,
            promote_group: 1.0,
        }
    }
}

/// The mutable group pool: the ranked queue the allocator pops from, and the set of
/// groups that can no longer receive assignments this run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerState {
    /// Arena of every surviving group, indexed by `GroupId`.
    pub groups: Vec<VolunteerGroup>,
    /// Ids into `groups`, kept sorted descending by ranking score; index 0 is "front".
    pub ranking: Vec<GroupId>,
    pub exhausted: BTreeSet<GroupId>,
}

impl VolunteerState {
    pub fn group(&self, id: GroupId) -> &VolunteerGroup {
        &self.groups[id.0]
    }

    pub fn group_mut(&mut self, id: GroupId) -> &mut VolunteerGroup {
        &mut self.groups[id.0]
    }

    pub fn is_exhausted(&self, id: GroupId) -> bool {
        self.exhausted.contains(&id)
    }
}

/// The complete allocation state: shifts, the group pool, and the cross-rota history
/// the engine may consult but never mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotaState {
    pub shifts: Vec<Shift>,
    pub volunteer_state: VolunteerState,
    pub historical_shifts: Vec<HistoricalShift>,
    pub max_allocation_frequency: f64,
    pub weights: RankingWeights,
}

impl RotaState {
    pub fn max_allocation_count(&self) -> usize {
        (self.shifts.len() as f64 * self.max_allocation_frequency).floor() as usize
    }

    pub fn last_historical_shift(&self) -> Option<&HistoricalShift> {
        self.historical_shifts.last()
    }
}

/// One structural or policy defect surfaced by the validator (§4.7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftValidationError {
    /// `None` for errors that don't anchor to one shift (the spec's `-1`).
    pub shift_index: Option<usize>,
    pub shift_date: Option<String>,
    /// `"CoreInvariant"` for allocator-maintained checks, else the criterion's name.
    pub criterion_name: String,
    pub description: String,
}

impl std::fmt::Display for ShiftValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.shift_date, self.shift_index) {
            (Some(date), Some(idx)) => write!(
                f,
                "[{}] shift {} ({}): {}",
                self.criterion_name, idx, date, self.description
            ),
            _ => write!(f, "[{}] {}", self.criterion_name, self.description),
        }
    }
}

/// The result of one `allocate` call (§4.7, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub state: RotaState,
    pub success: bool,
    pub underutilized_groups: Vec<GroupId>,
    pub validation_errors: Vec<ShiftValidationError>,
}

/// A caller-supplied per-date rule: size override, extra pre-allocations, or closure.
///
/// `applies_to` stands in for the recurrence-rule predicate the spec describes; the
/// engine never parses rule strings (§9), it only evaluates whatever the caller hands
/// it against a date key.
pub struct ShiftOverride {
    pub applies_to: Box<dyn Fn(&str) -> bool>,
    pub shift_size: Option<usize>,
    pub custom_preallocations: Vec<String>,
    pub closed: bool,
}

impl std::fmt::Debug for ShiftOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShiftOverride")
            .field("shift_size", &self.shift_size)
            .field("custom_preallocations", &self.custom_preallocations)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
