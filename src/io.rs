//! File-based import/export around the engine (§11): a single JSON "scenario" bundling
//! everything `AllocationConfig` needs, and CSV/JSON export of the resulting outcome.

use crate::ids::{GroupKey, VolunteerId};
use crate::model::{
    AllocationOutcome, HistoricalShift, PreexistingAssignment, RankingWeights, ShiftOverride,
    Volunteer, VolunteerAvailability,
};
use anyhow::Context;
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// One per-date rule as it appears on disk: an explicit list of matching dates rather
/// than a recurrence predicate, since the engine consumes pre-expanded overrides (§4.3,
/// §6) and recurrence-rule expansion is out of scope for the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOverride {
    pub applies_to_dates: BTreeSet<String>,
    pub shift_size: Option<usize>,
    #[serde(default)]
    pub custom_preallocations: Vec<String>,
    #[serde(default)]
    pub closed: bool,
}

/// One shift the caller has already populated, as it appears on disk — group keys are
/// plain strings rather than the closure-bearing runtime representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAssignment {
    pub shift_date: String,
    pub allocated_group_keys: Vec<String>,
}

/// The whole-file shape the CLI reads: everything `AllocationConfig` needs, serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub volunteers: Vec<Volunteer>,
    pub availability: Vec<VolunteerAvailability>,
    pub shift_dates: Vec<String>,
    pub default_shift_size: usize,
    #[serde(default)]
    pub overrides: Vec<ScenarioOverride>,
    #[serde(default)]
    pub historical_shifts: Vec<HistoricalShift>,
    pub max_allocation_frequency: f64,
    #[serde(default)]
    pub weights: RankingWeights,
    /// Pre-existing assignments for a scenario the `validate` subcommand is
    /// re-checking rather than running the greedy loop over (§12).
    #[serde(default)]
    pub shift_assignments: Vec<ScenarioAssignment>,
}

pub fn load_scenario_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Scenario> {
    let data = fs::read(path.as_ref())
        .with_context(|| format!("reading {}", path.as_ref().display()))?;
    let scenario: Scenario =
        serde_json::from_slice(&data).with_context(|| "parsing scenario JSON")?;
    for date in &scenario.shift_dates {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("invalid shift date: {date}"))?;
    }
    Ok(scenario)
}

/// Turns the on-disk, serializable override list into the closures `init_shifts`
/// expects, since `ShiftOverride::applies_to` can't derive `Deserialize`.
pub fn into_shift_overrides(overrides: Vec<ScenarioOverride>) -> Vec<ShiftOverride> {
    overrides
        .into_iter()
        .map(|ov| ShiftOverride {
            applies_to: Box::new(move |date: &str| ov.applies_to_dates.contains(date)),
            shift_size: ov.shift_size,
            custom_preallocations: ov.custom_preallocations.clone(),
            closed: ov.closed,
        })
        .collect()
}

/// Turns the on-disk assignment list into `PreexistingAssignment`s carrying real
/// `GroupKey`s, mirroring `into_shift_overrides`.
pub fn into_preexisting_assignments(
    assignments: Vec<ScenarioAssignment>,
) -> Vec<PreexistingAssignment> {
    assignments
        .into_iter()
        .map(|a| PreexistingAssignment {
            shift_date: a.shift_date,
            allocated_group_keys: a.allocated_group_keys.into_iter().map(GroupKey::new).collect(),
        })
        .collect()
}

pub fn export_outcome_json<P: AsRef<Path>>(path: P, outcome: &AllocationOutcome) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(outcome)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV of the final rota: header `index,date,closed,team_lead,male_count,allocated_groups`
pub fn export_shifts_csv<P: AsRef<Path>>(path: P, outcome: &AllocationOutcome) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["index", "date", "closed", "team_lead", "male_count", "allocated_groups"])?;
    let mut itoa_buf = itoa::Buffer::new();
    for shift in &outcome.state.shifts {
        let team_lead: &str = shift
            .team_lead
            .as_ref()
            .map(VolunteerId::as_str)
            .unwrap_or("");
        let groups = shift
            .allocated_groups
            .iter()
            .map(|&id| outcome.state.volunteer_state.group(id).group_key.as_str().to_string())
            .collect::<Vec<_>>()
            .join(";");
        let index = itoa_buf.format(shift.index).to_string();
        let male_count = itoa_buf.format(shift.male_count).to_string();
        w.write_record([
            index.as_str(),
            shift.date.as_str(),
            shift.closed.to_string().as_str(),
            team_lead,
            male_count.as_str(),
            groups.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Reads back a previously-exported outcome JSON and reduces its shifts to
/// `HistoricalShift`s, so sequential weekly runs can feed last week's result in as
/// this week's history without hand-editing anything (§11).
pub fn historical_shifts_from_outcome_json<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<Vec<HistoricalShift>> {
    let data = fs::read(path.as_ref())
        .with_context(|| format!("reading {}", path.as_ref().display()))?;
    let outcome: AllocationOutcome =
        serde_json::from_slice(&data).with_context(|| "parsing prior outcome JSON")?;
    Ok(outcome
        .state
        .shifts
        .iter()
        .map(|shift| HistoricalShift {
            date: shift.date.clone(),
            allocated_group_keys: shift
                .allocated_groups
                .iter()
                .map(|&id| outcome.state.volunteer_state.group(id).group_key.clone())
                .collect(),
        })
        .collect())
}
