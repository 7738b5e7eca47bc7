//! trainer-dashboard: run the training engine over a JSON export
//!
//! Usage:
//! ```bash
//! # Load series (ATL/CTL/TSB per day)
//! trainer-dashboard --input athlete.json load
//!
//! # Periodized plan for the nearest upcoming race
//! trainer-dashboard --input athlete.json plan
//!
//! # Day slots for plan week 3, as seen on a given day
//! trainer-dashboard --input athlete.json --today 2026-11-02 week --week 3
//!
//! # Coaching insights and the full coach context
//! trainer-dashboard --input athlete.json insights
//! trainer-dashboard --input athlete.json context
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use trainer_engine::calendar::today_utc;
use trainer_engine::summary::next_race;
use trainer_engine::{
  compute_koop_plan_as_of, compute_training_load_as_of, compute_weekly_calendar_with,
  generate_coaching_insights_as_of, CoachContext, ConfigError, DashboardInput, EngineConfig, KoopPlan,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
  #[error("Failed to read {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("No plan with a race on or after {0}")]
  NoUpcomingRace(NaiveDate),

  #[error("Plan has no week {0}")]
  WeekNotFound(u32),

  #[error("Plan has not started yet; pass --week")]
  NoCurrentWeek,
}

#[derive(Parser)]
#[command(
  name = "trainer-dashboard",
  about = "Training load, race plans and coaching insights from a JSON export"
)]
struct Cli {
  #[command(subcommand)]
  command: Command,

  /// Dashboard input JSON (activities, checkins, plans, availabilityDaysPerWeek)
  #[arg(long, short = 'i', global = true, default_value = "dashboard.json")]
  input: PathBuf,

  /// Engine config JSON; defaults to TRAINER_* environment overrides
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Evaluate as of this day (YYYY-MM-DD) instead of today (UTC)
  #[arg(long, global = true)]
  today: Option<NaiveDate>,

  /// Enable debug logging
  #[arg(long, short = 'v', global = true)]
  verbose: bool,
}

#[derive(Subcommand)]
enum Command {
  /// Daily ATL/CTL/TSB series
  Load,

  /// Periodized plan for the nearest upcoming race
  Plan,

  /// Seven day slots of one plan week
  Week {
    /// 1-based plan week (default: the current week)
    #[arg(long)]
    week: Option<u32>,
  },

  /// Prioritized coaching insights
  Insights,

  /// Coach context package
  Context,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();

  match run(cli) {
    Ok(output) => {
      println!("{}", output);
      ExitCode::SUCCESS
    }
    Err(e) => {
      error!("{}", e);
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<String, CliError> {
  let config = match &cli.config {
    Some(path) => EngineConfig::from_json(&read(path)?)?,
    None => EngineConfig::from_env()?,
  };
  let input: DashboardInput = serde_json::from_str(&read(&cli.input)?)?;
  let today = cli.today.unwrap_or_else(today_utc);

  info!(
    activities = input.activities.len(),
    checkins = input.checkins.len(),
    plans = input.plans.len(),
    %today,
    "loaded dashboard input"
  );

  match cli.command {
    Command::Load => pretty(&compute_training_load_as_of(&input.activities, today, &config.load)),
    Command::Plan => pretty(&upcoming_plan(&input, today, &config)?.1),
    Command::Week { week } => {
      let (plan, koop) = upcoming_plan(&input, today, &config)?;
      let selected = match week {
        Some(n) => koop.week(n).ok_or(CliError::WeekNotFound(n))?,
        None => koop.current_week().ok_or(CliError::NoCurrentWeek)?,
      };
      let slots = compute_weekly_calendar_with(
        selected,
        input.availability_days_per_week,
        plan.pair_long_run_weekends,
        &config.calendar,
      );
      pretty(&slots)
    }
    Command::Insights => pretty(&generate_coaching_insights_as_of(input.insight_input(), today, &config.load)),
    Command::Context => Ok(CoachContext::build(&input, today, &config).to_json()),
  }
}

fn upcoming_plan<'a>(
  input: &'a DashboardInput,
  today: NaiveDate,
  config: &EngineConfig,
) -> Result<(&'a trainer_engine::Plan, KoopPlan), CliError> {
  let (plan, _) = next_race(&input.plans, today).ok_or(CliError::NoUpcomingRace(today))?;
  Ok((plan, compute_koop_plan_as_of(plan, today, &config.plan)))
}

fn read(path: &Path) -> Result<String, CliError> {
  fs::read_to_string(path).map_err(|source| CliError::Io {
    path: path.to_path_buf(),
    source,
  })
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
  Ok(serde_json::to_string_pretty(value)?)
}
