//! Coach context package
//!
//! Bundles the derived training picture into one serializable document that a
//! chat collaborator can drop into a prompt.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::insights::{generate_from_series, Insight, InsightInput};
use crate::load::{compute_training_load_as_of, LoadSnapshot};
use crate::models::{Activity, CheckIn, Plan};
use crate::periodization::{compute_koop_plan_as_of, WeekPlan};
use crate::schedule::{compute_weekly_calendar_with, DaySlot};
use crate::summary::{latest_checkin, next_race, weekly_summaries, WeekSummary};

/// Weeks of history carried in the context
const RECENT_WEEKS: usize = 4;

/// Availability assumed when the input does not say
pub const DEFAULT_AVAILABILITY_DAYS: u32 = 5;

fn default_availability() -> u32 {
  DEFAULT_AVAILABILITY_DAYS
}

/// Everything the dashboard knows about the athlete
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInput {
  #[serde(default)]
  pub activities: Vec<Activity>,
  #[serde(default)]
  pub checkins: Vec<CheckIn>,
  #[serde(default)]
  pub plans: Vec<Plan>,
  #[serde(default = "default_availability")]
  pub availability_days_per_week: u32,
}

impl Default for DashboardInput {
  fn default() -> Self {
    Self {
      activities: Vec::new(),
      checkins: Vec::new(),
      plans: Vec::new(),
      availability_days_per_week: DEFAULT_AVAILABILITY_DAYS,
    }
  }
}

impl DashboardInput {
  pub fn insight_input(&self) -> InsightInput<'_> {
    InsightInput {
      activities: &self.activities,
      checkins: &self.checkins,
      plans: &self.plans,
    }
  }
}

/// The upcoming race and where the athlete stands in its plan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceContext {
  pub race_date: NaiveDate,
  pub days_until: i64,
  pub total_weeks: u32,
  pub peak_volume: f64,
  pub current_week: Option<WeekPlan>,
  /// Day slots of the current week, empty before the plan starts
  pub this_week: Vec<DaySlot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachContext {
  pub today: NaiveDate,
  pub load: Option<LoadSnapshot>,
  pub recent_weeks: Vec<WeekSummary>,
  pub latest_checkin: Option<CheckIn>,
  pub race: Option<RaceContext>,
  pub insights: Vec<Insight>,
}

impl CoachContext {
  pub fn build(input: &DashboardInput, today: NaiveDate, config: &EngineConfig) -> Self {
    let series = compute_training_load_as_of(&input.activities, today, &config.load);

    let weeks = weekly_summaries(&input.activities);
    let recent_weeks = weeks[weeks.len().saturating_sub(RECENT_WEEKS)..].to_vec();

    let race = next_race(&input.plans, today).map(|(plan, days_until)| {
      let koop = compute_koop_plan_as_of(plan, today, &config.plan);
      let current_week = koop.current_week().cloned();
      let this_week = current_week
        .as_ref()
        .map(|week| {
          compute_weekly_calendar_with(
            week,
            input.availability_days_per_week,
            plan.pair_long_run_weekends,
            &config.calendar,
          )
          .to_vec()
        })
        .unwrap_or_default();

      RaceContext {
        race_date: plan.race_date,
        days_until,
        total_weeks: koop.total_weeks,
        peak_volume: koop.peak_volume,
        current_week,
        this_week,
      }
    });

    Self {
      today,
      load: LoadSnapshot::from_series(&series),
      recent_weeks,
      latest_checkin: latest_checkin(&input.checkins).cloned(),
      race,
      insights: generate_from_series(input.insight_input(), &series, today),
    }
  }

  /// Serialize to JSON for a chat prompt
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}
