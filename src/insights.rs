//! Rule-based coaching insights
//!
//! Each rule reads one signal (load series, weekly totals, long-run history,
//! latest check-in, race proximity) and may emit an insight. Rules fire
//! independently; the final list is stably sorted by priority, 1 first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::today_utc;
use crate::config::LoadConfig;
use crate::load::{compute_training_load_as_of, LoadPoint};
use crate::models::{Activity, CheckIn, Plan};
use crate::summary::{latest_checkin, long_run_history, next_race, weekly_summaries};

/// Load rules need a week of series
const MIN_LOAD_POINTS: usize = 7;
/// Fitness trend compares against the CTL this many points back
const TREND_WINDOW: usize = 28;

/// ---------------------------------------------------------------------------
/// Insight Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
  Danger,
  Warning,
  Positive,
  Info,
}

/// Every insight the engine can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightId {
  OvertrainingRisk,
  LoadClimbing,
  WellRested,
  DeepFatigue,
  BalancedLoad,
  FitnessGrowing,
  FitnessDeclining,
  VolumeSpike,
  LongRunProgressing,
  NeedsRest,
  ElevatedFatigue,
  HighMotivation,
  NiggleAlert,
  RaceWeekApproaching,
  TaperPhase,
  GetStarted,
}

impl InsightId {
  pub fn as_str(&self) -> &'static str {
    match self {
      InsightId::OvertrainingRisk => "overtrainingRisk",
      InsightId::LoadClimbing => "loadClimbing",
      InsightId::WellRested => "wellRested",
      InsightId::DeepFatigue => "deepFatigue",
      InsightId::BalancedLoad => "balancedLoad",
      InsightId::FitnessGrowing => "fitnessGrowing",
      InsightId::FitnessDeclining => "fitnessDeclining",
      InsightId::VolumeSpike => "volumeSpike",
      InsightId::LongRunProgressing => "longRunProgressing",
      InsightId::NeedsRest => "needsRest",
      InsightId::ElevatedFatigue => "elevatedFatigue",
      InsightId::HighMotivation => "highMotivation",
      InsightId::NiggleAlert => "niggleAlert",
      InsightId::RaceWeekApproaching => "raceWeekApproaching",
      InsightId::TaperPhase => "taperPhase",
      InsightId::GetStarted => "getStarted",
    }
  }

  /// (kind, icon, priority). Priority: 1 = highest, 5 = lowest
  fn profile(&self) -> (InsightKind, &'static str, u8) {
    use InsightKind::*;
    match self {
      InsightId::OvertrainingRisk => (Danger, "alert-octagon", 1),
      InsightId::LoadClimbing => (Warning, "trending-up", 2),
      InsightId::WellRested => (Positive, "battery-full", 3),
      InsightId::DeepFatigue => (Warning, "battery-low", 2),
      InsightId::BalancedLoad => (Info, "scale", 4),
      InsightId::FitnessGrowing => (Positive, "activity", 3),
      InsightId::FitnessDeclining => (Warning, "trending-down", 2),
      InsightId::VolumeSpike => (Warning, "bar-chart", 2),
      InsightId::LongRunProgressing => (Positive, "route", 4),
      InsightId::NeedsRest => (Danger, "bed", 1),
      InsightId::ElevatedFatigue => (Warning, "tired", 2),
      InsightId::HighMotivation => (Positive, "flame", 4),
      InsightId::NiggleAlert => (Warning, "bandage", 1),
      InsightId::RaceWeekApproaching => (Info, "flag", 1),
      InsightId::TaperPhase => (Info, "calendar", 3),
      InsightId::GetStarted => (Info, "rocket", 5),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
  pub id: InsightId,
  pub kind: InsightKind,
  pub icon: String,
  pub title_key: String,
  pub desc_key: String,
  pub priority: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub meta: Option<String>,
}

impl Insight {
  pub fn new(id: InsightId) -> Self {
    let (kind, icon, priority) = id.profile();
    Self {
      id,
      kind,
      icon: icon.to_string(),
      title_key: format!("insights.{}.title", id.as_str()),
      desc_key: format!("insights.{}.desc", id.as_str()),
      priority,
      meta: None,
    }
  }

  pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
    self.meta = Some(meta.into());
    self
  }
}

/// ---------------------------------------------------------------------------
/// Engine
/// ---------------------------------------------------------------------------

/// Raw records the rules read
#[derive(Debug, Clone, Copy)]
pub struct InsightInput<'a> {
  pub activities: &'a [Activity],
  pub checkins: &'a [CheckIn],
  pub plans: &'a [Plan],
}

/// Insights relative to today (UTC) with default load constants
pub fn generate_coaching_insights(input: InsightInput<'_>) -> Vec<Insight> {
  generate_coaching_insights_as_of(input, today_utc(), &LoadConfig::default())
}

pub fn generate_coaching_insights_as_of(
  input: InsightInput<'_>,
  today: NaiveDate,
  config: &LoadConfig,
) -> Vec<Insight> {
  let series = compute_training_load_as_of(input.activities, today, config);
  generate_from_series(input, &series, today)
}

/// Same as [`generate_coaching_insights_as_of`] with a load series the caller already computed
pub fn generate_from_series(input: InsightInput<'_>, series: &[LoadPoint], today: NaiveDate) -> Vec<Insight> {
  let mut insights = Vec::new();

  if input.activities.is_empty() {
    insights.push(Insight::new(InsightId::GetStarted));
  } else {
    load_rules(series, &mut insights);
    fitness_trend_rules(series, &mut insights);
    volume_spike_rule(input.activities, &mut insights);
    long_run_rule(input.activities, &mut insights);
  }

  checkin_rules(input.checkins, &mut insights);
  race_rules(input.plans, today, &mut insights);

  // Stable: equal priorities keep rule order
  insights.sort_by_key(|i| i.priority);

  tracing::debug!(count = insights.len(), "generated coaching insights");
  insights
}

/// ---------------------------------------------------------------------------
/// Rules
/// ---------------------------------------------------------------------------

fn load_rules(series: &[LoadPoint], out: &mut Vec<Insight>) {
  if series.len() < MIN_LOAD_POINTS {
    return;
  }
  let Some(latest) = series.last() else {
    return;
  };

  if latest.ctl > 0.0 {
    let ratio = latest.atl / latest.ctl;
    if ratio > 1.5 {
      out.push(Insight::new(InsightId::OvertrainingRisk));
    } else if ratio > 1.2 {
      out.push(Insight::new(InsightId::LoadClimbing));
    }
  }

  let tsb = latest.tsb;
  if tsb > 10.0 {
    out.push(Insight::new(InsightId::WellRested));
  } else if tsb < -15.0 {
    out.push(Insight::new(InsightId::DeepFatigue));
  } else if (-5.0..=5.0).contains(&tsb) {
    out.push(Insight::new(InsightId::BalancedLoad));
  }
}

fn fitness_trend_rules(series: &[LoadPoint], out: &mut Vec<Insight>) {
  if series.len() < TREND_WINDOW {
    return;
  }
  let latest = series[series.len() - 1].ctl;
  let earlier = series[series.len() - TREND_WINDOW].ctl;
  if earlier <= 0.0 {
    return;
  }

  if latest > earlier * 1.10 {
    out.push(Insight::new(InsightId::FitnessGrowing));
  } else if latest < earlier * 0.85 {
    out.push(Insight::new(InsightId::FitnessDeclining));
  }
}

/// Latest activity week more than 15% above the week before it
fn volume_spike_rule(activities: &[Activity], out: &mut Vec<Insight>) {
  let weeks = weekly_summaries(activities);
  if let [.., prior, last] = weeks.as_slice() {
    if prior.distance_km > 0.0 && last.distance_km > prior.distance_km * 1.15 {
      out.push(Insight::new(InsightId::VolumeSpike));
    }
  }
}

/// Three most recent long-run weeks never shrinking
fn long_run_rule(activities: &[Activity], out: &mut Vec<Insight>) {
  let history = long_run_history(activities);
  if let [.., a, b, c] = history.as_slice() {
    if a.distance_km <= b.distance_km && b.distance_km <= c.distance_km {
      out.push(Insight::new(InsightId::LongRunProgressing));
    }
  }
}

fn checkin_rules(checkins: &[CheckIn], out: &mut Vec<Insight>) {
  let Some(latest) = latest_checkin(checkins) else {
    return;
  };

  let fatigued = latest.fatigue.is_some_and(|f| f >= 4);
  let poor_sleep = latest.sleep_quality.is_some_and(|s| s <= 2);
  if fatigued && poor_sleep {
    out.push(Insight::new(InsightId::NeedsRest));
  } else if fatigued {
    out.push(Insight::new(InsightId::ElevatedFatigue));
  }

  if latest.motivation.is_some_and(|m| m >= 4) {
    out.push(Insight::new(InsightId::HighMotivation));
  }

  if let Some(niggle) = latest.niggle_text() {
    out.push(Insight::new(InsightId::NiggleAlert).with_meta(niggle));
  }
}

fn race_rules(plans: &[Plan], today: NaiveDate, out: &mut Vec<Insight>) {
  let Some((_, days_out)) = next_race(plans, today) else {
    return;
  };

  let weeks_out = days_out as f64 / 7.0;
  if weeks_out <= 2.0 {
    out.push(Insight::new(InsightId::RaceWeekApproaching));
  } else if weeks_out <= 4.0 {
    out.push(Insight::new(InsightId::TaperPhase));
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
