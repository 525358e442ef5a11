#![forbid(unsafe_code)]
//! Rota allocation CLI: drives the engine from a JSON scenario file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rota_allocator::io::{
    export_outcome_json, export_shifts_csv, into_preexisting_assignments, into_shift_overrides,
    load_scenario_json,
};
use rota_allocator::{allocate, default_criteria, validate_only, AllocationConfig};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Allocates volunteers to weekly rota shifts from a scenario file (no database).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Enable logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the allocator and write the resulting outcome.
    Allocate {
        /// Path to the scenario JSON file.
        #[arg(long)]
        scenario: String,
        /// Path to write the outcome JSON to.
        #[arg(long)]
        out: String,
        /// Optional path to additionally write a CSV summary of the final rota.
        #[arg(long)]
        out_csv: Option<String>,
        /// Write the outcome even when `Success` is false.
        #[arg(long)]
        force_commit: bool,
    },
    /// Initialize and validate a scenario without running the greedy loop.
    Validate {
        /// Path to the scenario JSON file.
        #[arg(long)]
        scenario: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        Subscriber::builder().with_env_filter(filter).init();
    }
    #[cfg(not(feature = "logging"))]
    if cli.log {
        eprintln!("--log has no effect: rebuild with --features logging");
    }

    match cli.cmd {
        Commands::Allocate {
            scenario,
            out,
            out_csv,
            force_commit,
        } => run_allocate(&scenario, &out, out_csv.as_deref(), force_commit),
        Commands::Validate { scenario } => run_validate(&scenario),
    }
}

fn run_allocate(scenario_path: &str, out: &str, out_csv: Option<&str>, force_commit: bool) -> Result<()> {
    let scenario = load_scenario_json(scenario_path)
        .with_context(|| format!("loading scenario {scenario_path}"))?;

    let config = AllocationConfig {
        criteria: default_criteria(),
        max_allocation_frequency: scenario.max_allocation_frequency,
        historical_shifts: scenario.historical_shifts,
        volunteers: scenario.volunteers,
        availability: scenario.availability,
        shift_dates: scenario.shift_dates,
        default_shift_size: scenario.default_shift_size,
        overrides: into_shift_overrides(scenario.overrides),
        weights: scenario.weights,
        preexisting_assignments: into_preexisting_assignments(scenario.shift_assignments),
    };

    let outcome = allocate(config).context("running allocation")?;

    if !outcome.success {
        for error in &outcome.validation_errors {
            eprintln!("{error}");
        }
        if !force_commit {
            anyhow::bail!("allocation did not succeed; pass --force-commit to write anyway");
        }
    }

    export_outcome_json(out, &outcome).with_context(|| format!("writing outcome to {out}"))?;
    if let Some(csv_path) = out_csv {
        export_shifts_csv(csv_path, &outcome)
            .with_context(|| format!("writing CSV summary to {csv_path}"))?;
    }

    println!(
        "wrote {out} ({} shift(s), success={})",
        outcome.state.shifts.len(),
        outcome.success
    );
    Ok(())
}

fn run_validate(scenario_path: &str) -> Result<()> {
    let scenario = load_scenario_json(scenario_path)
        .with_context(|| format!("loading scenario {scenario_path}"))?;

    let config = AllocationConfig {
        criteria: default_criteria(),
        max_allocation_frequency: scenario.max_allocation_frequency,
        historical_shifts: scenario.historical_shifts,
        volunteers: scenario.volunteers,
        availability: scenario.availability,
        shift_dates: scenario.shift_dates,
        default_shift_size: scenario.default_shift_size,
        overrides: into_shift_overrides(scenario.overrides),
        weights: scenario.weights,
        preexisting_assignments: into_preexisting_assignments(scenario.shift_assignments),
    };

    let outcome = validate_only(config).context("validating scenario")?;
    if outcome.success {
        println!("scenario is structurally valid");
    } else {
        for error in &outcome.validation_errors {
            println!("{error}");
        }
        anyhow::bail!("{} validation error(s)", outcome.validation_errors.len());
    }
    Ok(())
}
