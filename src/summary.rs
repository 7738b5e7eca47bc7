//! Derived summaries over raw records
//!
//! Weekly totals, long-run history, latest check-in and the next race. These
//! feed the coaching rules and the coach context package.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::{days_between, week_start_date};
use crate::models::{Activity, CheckIn, Plan};

/// Totals for one Monday-based activity week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
  pub week_start: NaiveDate,
  pub distance_km: f64,
  pub moving_minutes: f64,
  pub elevation_gain_m: f64,
  pub activity_count: u32,
}

impl WeekSummary {
  fn empty(week_start: NaiveDate) -> Self {
    Self {
      week_start,
      distance_km: 0.0,
      moving_minutes: 0.0,
      elevation_gain_m: 0.0,
      activity_count: 0,
    }
  }
}

/// Longest run of a week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongRunWeek {
  pub week_start: NaiveDate,
  pub distance_km: f64,
}

/// One summary per week that has at least one activity, oldest first
pub fn weekly_summaries(activities: &[Activity]) -> Vec<WeekSummary> {
  let mut weeks: BTreeMap<NaiveDate, WeekSummary> = BTreeMap::new();

  for activity in sorted(activities) {
    let key = week_start_date(activity.date());
    let week = weeks.entry(key).or_insert_with(|| WeekSummary::empty(key));
    week.distance_km += activity.distance_km();
    week.moving_minutes += activity.moving_minutes();
    week.elevation_gain_m += activity.elevation_gain();
    week.activity_count += 1;
  }

  weeks.into_values().collect()
}

/// The longest run in each week that has a run with distance, oldest first
pub fn long_run_history(activities: &[Activity]) -> Vec<LongRunWeek> {
  let mut weeks: BTreeMap<NaiveDate, f64> = BTreeMap::new();

  for activity in activities.iter().filter(|a| a.is_run() && a.distance_km() > 0.0) {
    let longest = weeks.entry(week_start_date(activity.date())).or_insert(0.0);
    *longest = longest.max(activity.distance_km());
  }

  weeks
    .into_iter()
    .map(|(week_start, distance_km)| LongRunWeek {
      week_start,
      distance_km,
    })
    .collect()
}

/// Most recent check-in by date; on equal dates the later one in the list wins
pub fn latest_checkin(checkins: &[CheckIn]) -> Option<&CheckIn> {
  checkins.iter().fold(None, |latest: Option<&CheckIn>, c| match latest {
    Some(l) if l.date > c.date => Some(l),
    _ => Some(c),
  })
}

/// Nearest plan whose race is today or later, with the days remaining
pub fn next_race(plans: &[Plan], today: NaiveDate) -> Option<(&Plan, i64)> {
  plans
    .iter()
    .map(|p| (p, days_between(today, p.race_date)))
    .filter(|(_, days)| *days >= 0)
    .min_by_key(|(_, days)| *days)
}

/// Chronological order with a stable tie-break so summation order never depends on input order
fn sorted(activities: &[Activity]) -> Vec<&Activity> {
  let mut sorted: Vec<&Activity> = activities.iter().collect();
  sorted.sort_by(|a, b| {
    a.started_at
      .cmp(&b.started_at)
      .then(a.distance_km().total_cmp(&b.distance_km()))
      .then(a.moving_minutes().total_cmp(&b.moving_minutes()))
  });
  sorted
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;
  use chrono::Duration;

  #[test]
  fn test_weekly_summaries_bucket_by_monday() {
    // today() is Saturday 17 Oct 2026; its week starts Monday 12 Oct
    let activities = vec![
      mock_run(0, 60.0, 10.0),                         // Sat 17
      mock_run(5, 30.0, 5.0),                          // Mon 12
      mock_run(6, 45.0, 7.0),                          // Sun 11, previous week
      mock_activity(days_ago(12), "Ride", 90.0, 40.0), // Mon 5
    ];

    let weeks = weekly_summaries(&activities);

    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].week_start, NaiveDate::from_ymd_opt(2026, 10, 5).unwrap());
    assert_eq!(weeks[0].activity_count, 2);
    assert!((weeks[0].distance_km - 47.0).abs() < 1e-9);
    assert_eq!(weeks[1].week_start, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
    assert!((weeks[1].distance_km - 15.0).abs() < 1e-9);
    assert!((weeks[1].moving_minutes - 90.0).abs() < 1e-9);
    assert!((weeks[1].elevation_gain_m - 100.0).abs() < 1e-9);
  }

  #[test]
  fn test_weekly_summaries_late_sunday_stays_in_week() {
    let mut late = mock_run(6, 30.0, 5.0); // Sunday 11 Oct, 07:00
    late.started_at += Duration::hours(16) + Duration::minutes(59); // 23:59 UTC

    let weeks = weekly_summaries(&[late]);

    assert_eq!(weeks[0].week_start, NaiveDate::from_ymd_opt(2026, 10, 5).unwrap());
  }

  #[test]
  fn test_long_run_history_takes_longest_run_only() {
    let activities = vec![
      mock_run(22, 120.0, 21.0), // Fri 25 Sep
      mock_run(20, 50.0, 8.0),   // Sun 27 Sep, same week
      mock_activity(days_ago(16), "Ride", 200.0, 80.0), // rides never count
      mock_run(9, 100.0, 18.0),
      mock_activity(days_ago(1), "TrailRun", 150.0, 24.0),
    ];

    let history = long_run_history(&activities);
    let distances: Vec<f64> = history.iter().map(|w| w.distance_km).collect();

    assert_eq!(distances, vec![21.0, 18.0, 24.0]);
  }

  #[test]
  fn test_latest_checkin() {
    assert!(latest_checkin(&[]).is_none());

    let checkins = vec![
      mock_checkin(days_ago(1), 2, 4, 3, None),
      mock_checkin(days_ago(0), 4, 2, 3, None),
      mock_checkin(days_ago(3), 1, 5, 5, None),
      mock_checkin(days_ago(0), 5, 1, 1, Some("calf")),
    ];

    let latest = latest_checkin(&checkins).unwrap();
    assert_eq!(latest.date, today());
    assert_eq!(latest.fatigue, Some(5));
  }

  #[test]
  fn test_next_race_skips_past_races() {
    let plans = vec![mock_plan(-3, 40.0, false), mock_plan(60, 40.0, false), mock_plan(20, 40.0, false)];

    let (plan, days) = next_race(&plans, today()).unwrap();
    assert_eq!(days, 20);
    assert_eq!(plan.race_date, days_from_today(20));

    assert!(next_race(&plans[..1], today()).is_none());
    assert_eq!(next_race(&[mock_plan(0, 40.0, false)], today()).map(|(_, d)| d), Some(0));
  }
}
