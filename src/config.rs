//! Tunable engine parameters
//!
//! Defaults reproduce the reference coaching policy. Overrides come from the
//! environment (optionally via a `.env` file) or a JSON document.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ConfigError;

/// ---------------------------------------------------------------------------
/// Configuration Sections
/// ---------------------------------------------------------------------------

/// Exponential moving-average time constants, in days
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoadConfig {
  pub atl_days: f64,
  pub ctl_days: f64,
}

impl Default for LoadConfig {
  fn default() -> Self {
    Self {
      atl_days: 7.0,
      ctl_days: 42.0,
    }
  }
}

impl LoadConfig {
  /// Smoothing factor 2 / (N + 1)
  pub fn atl_alpha(&self) -> f64 {
    2.0 / (self.atl_days + 1.0)
  }

  pub fn ctl_alpha(&self) -> f64 {
    2.0 / (self.ctl_days + 1.0)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanConfig {
  /// Weekly km assumed when a plan carries no usable volume
  pub default_weekly_volume: f64,
  /// Shortest plan ever generated
  pub min_weeks: u32,
}

impl Default for PlanConfig {
  fn default() -> Self {
    Self {
      default_weekly_volume: 50.0,
      min_weeks: 4,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalendarConfig {
  /// Minimum km for any easy/recovery filler day
  pub min_filler_distance: f64,
  /// Minimum km for the midweek key workout
  pub min_key_workout_distance: f64,
  /// Key workout share of the weekly volume
  pub key_workout_share: f64,
  /// Saturday medium-long as a share of the Sunday long run
  pub medium_long_share: f64,
}

impl Default for CalendarConfig {
  fn default() -> Self {
    Self {
      min_filler_distance: 3.0,
      min_key_workout_distance: 5.0,
      key_workout_share: 0.15,
      medium_long_share: 0.65,
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
  pub load: LoadConfig,
  pub plan: PlanConfig,
  pub calendar: CalendarConfig,
}

/// ---------------------------------------------------------------------------
/// Loading
/// ---------------------------------------------------------------------------

impl EngineConfig {
  /// Load `.env` if present, then apply `TRAINER_*` overrides on top of the defaults
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();

    let mut config = Self::default();

    if let Some(v) = positive_var("TRAINER_ATL_DAYS")? {
      config.load.atl_days = v;
    }
    if let Some(v) = positive_var("TRAINER_CTL_DAYS")? {
      config.load.ctl_days = v;
    }
    if let Some(v) = positive_var("TRAINER_DEFAULT_WEEKLY_VOLUME")? {
      config.plan.default_weekly_volume = v;
    }
    if let Some(v) = positive_var("TRAINER_MIN_WEEKS")? {
      if v.fract() != 0.0 {
        return Err(ConfigError::invalid("TRAINER_MIN_WEEKS", &v.to_string(), "must be a whole number"));
      }
      config.plan.min_weeks = v as u32;
    }
    if let Some(v) = positive_var("TRAINER_MIN_FILLER_KM")? {
      config.calendar.min_filler_distance = v;
    }
    if let Some(v) = positive_var("TRAINER_MIN_KEY_WORKOUT_KM")? {
      config.calendar.min_key_workout_distance = v;
    }

    tracing::debug!(?config, "engine config loaded from environment");
    Ok(config)
  }

  /// Parse a JSON config document; missing sections keep their defaults
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(json)?)
  }
}

fn positive_var(key: &str) -> Result<Option<f64>, ConfigError> {
  let raw = match env::var(key) {
    Ok(raw) => raw,
    Err(_) => return Ok(None),
  };

  let value: f64 = raw
    .trim()
    .parse()
    .map_err(|_| ConfigError::invalid(key, &raw, "not a number"))?;

  if !value.is_finite() || value <= 0.0 {
    return Err(ConfigError::invalid(key, &raw, "must be positive"));
  }

  Ok(Some(value))
}
