use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::lenient_f64;

/// A synced or manually entered activity, as supplied by the persistence layer.
/// Raw units: meters and seconds. Algorithms read the converted accessors only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
  pub started_at: DateTime<Utc>,
  #[serde(default, deserialize_with = "lenient_f64")]
  pub distance_meters: Option<f64>,
  #[serde(default, deserialize_with = "lenient_f64")]
  pub moving_time_seconds: Option<f64>,
  #[serde(default, deserialize_with = "lenient_f64")]
  pub elevation_gain_meters: Option<f64>,
  #[serde(rename = "type", default)]
  pub activity_type: String,
  #[serde(default)]
  pub name: String,
  /// Seconds spent in HR zones 1-5. Carried through, not read by the engine.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub heart_rate_zone_seconds: Option<Vec<f64>>,
}

impl Activity {
  /// Distance in kilometers, zero when missing
  pub fn distance_km(&self) -> f64 {
    self.distance_meters.map(|m| m / 1000.0).unwrap_or(0.0)
  }

  /// Moving time in minutes, zero when missing. This is the daily load unit.
  pub fn moving_minutes(&self) -> f64 {
    self.moving_time_seconds.map(|s| s / 60.0).unwrap_or(0.0)
  }

  /// Elevation gain in meters, zero when missing
  pub fn elevation_gain(&self) -> f64 {
    self.elevation_gain_meters.unwrap_or(0.0)
  }

  /// UTC calendar day the activity started on
  pub fn date(&self) -> NaiveDate {
    self.started_at.date_naive()
  }

  /// Run, TrailRun, VirtualRun... anything whose type mentions running
  pub fn is_run(&self) -> bool {
    self.activity_type.to_lowercase().contains("run")
  }
}
