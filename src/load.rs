//! Training load model
//!
//! Daily load is the sum of moving minutes on each UTC calendar day. ATL
//! (fatigue) and CTL (fitness) are exponentially weighted averages of that
//! daily series seeded at zero; TSB (form) is CTL - ATL. The series is rebuilt
//! from the full activity list on every call.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{days_between, today_utc};
use crate::config::LoadConfig;
use crate::models::Activity;

/// ---------------------------------------------------------------------------
/// Load Series
/// ---------------------------------------------------------------------------

/// One day of the performance-management series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadPoint {
  pub date: NaiveDate,
  /// Acute Training Load: 7-day EWMA of daily minutes
  pub atl: f64,
  /// Chronic Training Load: 42-day EWMA of daily minutes
  pub ctl: f64,
  /// Training Stress Balance: CTL - ATL
  pub tsb: f64,
}

/// Load series from the earliest activity through today (UTC), default constants
pub fn compute_training_load(activities: &[Activity]) -> Vec<LoadPoint> {
  compute_training_load_as_of(activities, today_utc(), &LoadConfig::default())
}

/// Load series from the earliest activity through `today`, inclusive, one point per day.
///
/// Input order does not matter. Activities dated after `today` are ignored;
/// if every activity is in the future the series is empty.
pub fn compute_training_load_as_of(
  activities: &[Activity],
  today: NaiveDate,
  config: &LoadConfig,
) -> Vec<LoadPoint> {
  let Some((first_day, daily)) = daily_minutes(activities, today) else {
    return Vec::new();
  };

  let atl_alpha = config.atl_alpha();
  let ctl_alpha = config.ctl_alpha();

  let mut atl = 0.0;
  let mut ctl = 0.0;
  let series: Vec<LoadPoint> = daily
    .iter()
    .enumerate()
    .map(|(offset, load)| {
      atl = atl_alpha * load + (1.0 - atl_alpha) * atl;
      ctl = ctl_alpha * load + (1.0 - ctl_alpha) * ctl;
      LoadPoint {
        date: first_day + Duration::days(offset as i64),
        atl,
        ctl,
        tsb: ctl - atl,
      }
    })
    .collect();

  tracing::debug!(
    activities = activities.len(),
    days = series.len(),
    "computed training load series"
  );
  series
}

/// Per-day minutes from the earliest activity day to `today`.
/// None when there is nothing on or before `today`.
fn daily_minutes(activities: &[Activity], today: NaiveDate) -> Option<(NaiveDate, Vec<f64>)> {
  let mut sorted: Vec<&Activity> = activities.iter().collect();
  // Tie-break on minutes so same-instant activities always sum in the same order
  sorted.sort_by(|a, b| {
    a.started_at
      .cmp(&b.started_at)
      .then(a.moving_minutes().total_cmp(&b.moving_minutes()))
  });

  let first_day = sorted.first()?.date();
  if first_day > today {
    tracing::warn!(%first_day, %today, "all activities are dated after today, no load series");
    return None;
  }

  let span = days_between(first_day, today) as usize + 1;
  let mut daily = vec![0.0; span];
  let mut future = 0usize;

  for activity in sorted {
    let offset = days_between(first_day, activity.date()) as usize;
    match daily.get_mut(offset) {
      Some(day) => *day += activity.moving_minutes(),
      None => future += 1,
    }
  }

  if future > 0 {
    tracing::warn!(count = future, %today, "ignored activities dated after today");
  }

  Some((first_day, daily))
}

/// ---------------------------------------------------------------------------
/// Form Band and Snapshot
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormBand {
  Fresh,        // TSB > 10
  Neutral,      // -5 to 10
  Productive,   // -15 to -5
  Overreaching, // < -15
}

impl FormBand {
  pub fn from_tsb(tsb: f64) -> Self {
    match tsb {
      t if t > 10.0 => FormBand::Fresh,
      t if t >= -5.0 => FormBand::Neutral,
      t if t >= -15.0 => FormBand::Productive,
      _ => FormBand::Overreaching,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      FormBand::Fresh => "fresh",
      FormBand::Neutral => "neutral",
      FormBand::Productive => "productive",
      FormBand::Overreaching => "overreaching",
    }
  }
}

/// Latest values of a load series, as read by coaching rules and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSnapshot {
  pub date: NaiveDate,
  pub atl: f64,
  pub ctl: f64,
  pub tsb: f64,
  /// Acute:chronic ratio, None while CTL is zero
  pub acute_chronic_ratio: Option<f64>,
  pub form: FormBand,
}

impl LoadSnapshot {
  pub fn from_series(series: &[LoadPoint]) -> Option<Self> {
    let latest = series.last()?;
    let acute_chronic_ratio = if latest.ctl > 0.0 {
      Some(latest.atl / latest.ctl)
    } else {
      None
    };

    Some(Self {
      date: latest.date,
      atl: latest.atl,
      ctl: latest.ctl,
      tsb: latest.tsb,
      acute_chronic_ratio,
      form: FormBand::from_tsb(latest.tsb),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::test_utils::*;

  fn load(activities: &[Activity]) -> Vec<LoadPoint> {
    compute_training_load_as_of(activities, today(), &LoadConfig::default())
  }

  #[test]
  fn test_empty_input_yields_empty_series() {
    assert!(load(&[]).is_empty());
  }

  #[test]
  fn test_series_spans_first_activity_through_today() {
    let activities = vec![mock_run(20, 45.0, 8.0), mock_run(3, 30.0, 5.0)];

    let series = load(&activities);

    assert_eq!(series.len(), 21, "20 days ago through today inclusive");
    assert_eq!(series.first().unwrap().date, days_ago(20));
    assert_eq!(series.last().unwrap().date, today());
    for pair in series.windows(2) {
      assert_eq!(pair[1].date - pair[0].date, Duration::days(1), "no gaps in the series");
    }
  }

  #[test]
  fn test_tsb_is_ctl_minus_atl_everywhere() {
    let activities = vec![
      mock_run(40, 90.0, 15.0),
      mock_run(33, 60.0, 10.0),
      mock_run(10, 120.0, 20.0),
      mock_run(2, 45.0, 7.0),
    ];

    for point in load(&activities) {
      assert_eq!(point.tsb, point.ctl - point.atl, "tsb mismatch on {}", point.date);
    }
  }

  #[test]
  fn test_first_day_matches_recurrence_from_zero() {
    let series = load(&[mock_run(0, 60.0, 10.0)]);

    assert_eq!(series.len(), 1);
    assert_approx_eq!(series[0].atl, 15.0, 1e-9); // 0.25 * 60
    assert_approx_eq!(series[0].ctl, 60.0 * 2.0 / 43.0, 1e-9);
  }

  #[test]
  fn test_same_day_activities_are_summed() {
    let morning = mock_run(0, 30.0, 5.0);
    let mut evening = mock_run(0, 45.0, 8.0);
    evening.started_at += Duration::hours(11);

    let series = load(&[morning, evening]);

    assert_eq!(series.len(), 1);
    assert_approx_eq!(series[0].atl, 0.25 * 75.0, 1e-9);
  }

  #[test]
  fn test_atl_overtakes_ctl_under_constant_load() {
    // 14 consecutive days of 60 minutes from zero history
    let series = load(&daily_runs(14, 60.0));

    assert_eq!(series.len(), 14);
    let last = series.last().unwrap();
    assert!(last.atl > last.ctl, "ATL {} should exceed CTL {}", last.atl, last.ctl);
    assert!(last.tsb < 0.0);
  }

  #[test]
  fn test_rest_days_decay_both_averages() {
    let series = load(&[mock_run(10, 60.0, 10.0)]);

    for pair in series.windows(2) {
      assert!(pair[1].atl < pair[0].atl);
      assert!(pair[1].ctl < pair[0].ctl);
    }
  }

  #[test]
  fn test_deterministic_and_order_independent() {
    let activities = vec![
      mock_run(30, 50.0, 9.0),
      mock_activity(days_ago(30), "Ride", 50.0, 25.0),
      mock_run(12, 75.0, 12.0),
      mock_activity(days_ago(5), "Swim", 40.0, 2.0),
      mock_run(1, 33.3, 5.5),
    ];
    let baseline = load(&activities);

    assert_eq!(load(&activities), baseline, "repeat call must be identical");

    // Every rotation and the reverse order
    for shift in 0..activities.len() {
      let mut rotated = activities.clone();
      rotated.rotate_left(shift);
      assert_eq!(load(&rotated), baseline, "rotation {} changed the series", shift);
    }
    let mut reversed = activities.clone();
    reversed.reverse();
    assert_eq!(load(&reversed), baseline);
  }

  #[test]
  fn test_missing_minutes_contribute_zero() {
    let mut broken = mock_run(2, 0.0, 10.0);
    broken.moving_time_seconds = None;

    let series = load(&[broken, mock_run(0, 60.0, 10.0)]);

    assert_eq!(series.len(), 3);
    assert_eq!(series[0].atl, 0.0);
    assert_eq!(series[1].atl, 0.0);
    assert!(series[2].atl > 0.0);
  }

  #[test]
  fn test_future_activities_are_ignored() {
    let series = load(&[mock_run(3, 60.0, 10.0), mock_activity(days_from_today(2), "Run", 60.0, 10.0)]);
    assert_eq!(series.len(), 4);

    let only_future = load(&[mock_activity(days_from_today(1), "Run", 60.0, 10.0)]);
    assert!(only_future.is_empty());
  }

  #[test]
  fn test_custom_time_constants() {
    let config = LoadConfig {
      atl_days: 3.0,
      ctl_days: 7.0,
    };
    let series = compute_training_load_as_of(&[mock_run(0, 100.0, 16.0)], today(), &config);

    assert_approx_eq!(series[0].atl, 50.0, 1e-9);
    assert_approx_eq!(series[0].ctl, 25.0, 1e-9);
  }

  #[test]
  fn test_form_bands() {
    assert_eq!(FormBand::from_tsb(12.0), FormBand::Fresh);
    assert_eq!(FormBand::from_tsb(10.0), FormBand::Neutral);
    assert_eq!(FormBand::from_tsb(-5.0), FormBand::Neutral);
    assert_eq!(FormBand::from_tsb(-5.1), FormBand::Productive);
    assert_eq!(FormBand::from_tsb(-15.0), FormBand::Productive);
    assert_eq!(FormBand::from_tsb(-15.1), FormBand::Overreaching);
    assert_eq!(FormBand::Overreaching.as_str(), "overreaching");
  }

  #[test]
  fn test_snapshot_reads_latest_point() {
    assert!(LoadSnapshot::from_series(&[]).is_none());

    let series = load(&daily_runs(14, 60.0));
    let snapshot = LoadSnapshot::from_series(&series).expect("non-empty series");

    assert_eq!(snapshot.date, today());
    let ratio = snapshot.acute_chronic_ratio.expect("ctl is positive");
    assert_approx_eq!(ratio, snapshot.atl / snapshot.ctl, 1e-12);
    assert!(ratio > 1.0);
  }
}
