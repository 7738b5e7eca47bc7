//! Test utilities shared by the module tests
//!
//! This module provides:
//! - A fixed "today" so date-relative tests are deterministic
//! - Mock data factories for activities, check-ins and plans
//! - Helper assertions

use crate::models::{Activity, CheckIn, Plan};
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Fixed reference day (a Saturday)
pub fn today() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

pub fn days_ago(days: i64) -> NaiveDate {
  today() - Duration::days(days)
}

pub fn days_from_today(days: i64) -> NaiveDate {
  today() + Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// An activity starting at 07:00 UTC on `date`
pub fn mock_activity(date: NaiveDate, activity_type: &str, minutes: f64, km: f64) -> Activity {
  Activity {
    started_at: Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(7, 0, 0).unwrap())),
    distance_meters: Some(km * 1000.0),
    moving_time_seconds: Some(minutes * 60.0),
    elevation_gain_meters: Some(50.0),
    activity_type: activity_type.to_string(),
    name: format!("{} {}", activity_type, date),
    heart_rate_zone_seconds: None,
  }
}

/// A run `days_ago` days before the reference day
pub fn mock_run(days_ago_n: i64, minutes: f64, km: f64) -> Activity {
  mock_activity(days_ago(days_ago_n), "Run", minutes, km)
}

/// One run per day for `days` consecutive days ending on the reference day
pub fn daily_runs(days: i64, minutes: f64) -> Vec<Activity> {
  (0..days)
    .rev()
    .map(|d| mock_run(d, minutes, minutes / 6.0))
    .collect()
}

pub fn mock_checkin(
  date: NaiveDate,
  fatigue: u8,
  sleep_quality: u8,
  motivation: u8,
  niggles: Option<&str>,
) -> CheckIn {
  CheckIn {
    date,
    fatigue: Some(fatigue),
    sleep_quality: Some(sleep_quality),
    motivation: Some(motivation),
    niggles: niggles.map(str::to_string),
  }
}

/// A plan whose race is `days_out` days after the reference day
pub fn mock_plan(days_out: i64, volume: f64, pair_long_run_weekends: bool) -> Plan {
  Plan::new(days_from_today(days_out), volume, pair_long_run_weekends)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_factories_create_valid_data() {
    let run = mock_run(3, 60.0, 10.0);
    assert_eq!(run.date(), days_ago(3));
    assert_approx_eq!(run.moving_minutes(), 60.0, 1e-9);
    assert_approx_eq!(run.distance_km(), 10.0, 1e-9);

    let series = daily_runs(14, 60.0);
    assert_eq!(series.len(), 14);
    assert_eq!(series.first().unwrap().date(), days_ago(13));
    assert_eq!(series.last().unwrap().date(), today());

    let plan = mock_plan(90, 30.0, true);
    assert_eq!(plan.race_date, NaiveDate::from_ymd_opt(2027, 1, 15).unwrap());
  }
}
