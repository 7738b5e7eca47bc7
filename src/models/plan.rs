use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient_f64;

/// A goal race. Drives the periodization generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
  pub race_date: NaiveDate,
  /// Current weekly volume in km. Absent or non-positive means "use the default".
  #[serde(default, deserialize_with = "lenient_f64")]
  pub current_weekly_volume: Option<f64>,
  #[serde(default)]
  pub pair_long_run_weekends: bool,
}

impl Plan {
  pub fn new(race_date: NaiveDate, current_weekly_volume: f64, pair_long_run_weekends: bool) -> Self {
    Self {
      race_date,
      current_weekly_volume: Some(current_weekly_volume),
      pair_long_run_weekends,
    }
  }

  /// Weekly volume to plan from, falling back to `default` for absent, zero,
  /// negative or non-finite values
  pub fn effective_volume(&self, default: f64) -> f64 {
    match self.current_weekly_volume {
      Some(v) if v.is_finite() && v > 0.0 => v,
      _ => default,
    }
  }
}
