//! Weekly calendar distribution
//!
//! Expands one plan week into seven day slots (Monday..Sunday): long run on
//! Sunday, key workout on Wednesday, optional medium-long Saturday, rest days
//! by availability, and the leftover volume spread over easy/recovery days.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::week_start_date;
use crate::config::CalendarConfig;
use crate::periodization::{PhaseKey, WeekPlan};

const MONDAY: usize = 0;
const TUESDAY: usize = 1;
const WEDNESDAY: usize = 2;
const THURSDAY: usize = 3;
const FRIDAY: usize = 4;
const SATURDAY: usize = 5;
const SUNDAY: usize = 6;

/// Race-week shakeout distances (km)
const TUESDAY_SHAKEOUT: f64 = 5.0;
const THURSDAY_SHAKEOUT: f64 = 3.0;

/// ---------------------------------------------------------------------------
/// Intensity Zones
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
  Z1, // Recovery
  Z2, // Aerobic / easy
  Z3, // Tempo
  Z4, // Threshold
  Z5, // VO2max
}

impl Zone {
  pub fn as_str(&self) -> &'static str {
    match self {
      Zone::Z1 => "Z1",
      Zone::Z2 => "Z2",
      Zone::Z3 => "Z3",
      Zone::Z4 => "Z4",
      Zone::Z5 => "Z5",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Day Slots
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotType {
  Long,
  Intensity,
  MediumLong,
  Easy,
  Recovery,
  Rest,
  Race,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
  pub date: NaiveDate,
  #[serde(rename = "type")]
  pub slot_type: SlotType,
  /// Translation key for the session name
  pub label: String,
  /// Planned distance in km, zero on rest days
  pub distance: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub intensity_zone: Option<Zone>,
}

impl DaySlot {
  fn session(date: NaiveDate, slot_type: SlotType, label: &str, distance: f64, zone: Zone) -> Self {
    Self {
      date,
      slot_type,
      label: label.to_string(),
      distance,
      intensity_zone: Some(zone),
    }
  }

  fn rest(date: NaiveDate) -> Self {
    Self {
      date,
      slot_type: SlotType::Rest,
      label: "rest".to_string(),
      distance: 0.0,
      intensity_zone: None,
    }
  }

  pub fn is_rest(&self) -> bool {
    self.slot_type == SlotType::Rest
  }
}

/// ---------------------------------------------------------------------------
/// Distribution
/// ---------------------------------------------------------------------------

/// Seven day slots for `week` with the default calendar policy
pub fn compute_weekly_calendar(
  week: &WeekPlan,
  availability_days_per_week: u32,
  pair_long_run_weekends: bool,
) -> [DaySlot; 7] {
  compute_weekly_calendar_with(
    week,
    availability_days_per_week,
    pair_long_run_weekends,
    &CalendarConfig::default(),
  )
}

pub fn compute_weekly_calendar_with(
  week: &WeekPlan,
  availability_days_per_week: u32,
  pair_long_run_weekends: bool,
  config: &CalendarConfig,
) -> [DaySlot; 7] {
  let monday = week_start_date(week.date);
  let dates: [NaiveDate; 7] = std::array::from_fn(|i| monday + Duration::days(i as i64));

  if week.phase == PhaseKey::Race {
    return race_week(&dates);
  }

  let mut slots: [Option<DaySlot>; 7] = Default::default();
  let mut remaining = week.volume;

  slots[SUNDAY] = Some(DaySlot::session(
    dates[SUNDAY],
    SlotType::Long,
    "long_run",
    week.long_run,
    Zone::Z2,
  ));
  remaining -= week.long_run;

  if !week.is_recovery_week {
    let distance = (week.volume * config.key_workout_share)
      .round()
      .max(config.min_key_workout_distance);
    let zone = if week.phase == PhaseKey::SpecificPrep {
      Zone::Z4
    } else {
      Zone::Z3
    };
    slots[WEDNESDAY] = Some(DaySlot::session(
      dates[WEDNESDAY],
      SlotType::Intensity,
      week.workout_key.as_str(),
      distance,
      zone,
    ));
    remaining -= distance;
  }

  if pair_long_run_weekends && !week.is_recovery_week && week.phase.allows_back_to_back() {
    let distance = (week.long_run * config.medium_long_share).round();
    slots[SATURDAY] = Some(DaySlot::session(
      dates[SATURDAY],
      SlotType::MediumLong,
      "medium_long_run",
      distance,
      Zone::Z2,
    ));
    remaining -= distance;
  }

  for &day in rest_days(availability_days_per_week) {
    if slots[day].is_none() {
      slots[day] = Some(DaySlot::rest(dates[day]));
    }
  }

  let empty: Vec<usize> = (MONDAY..=SUNDAY).filter(|&d| slots[d].is_none()).collect();

  if remaining > 0.0 && !empty.is_empty() {
    let (slot_type, label, zone) = if week.is_recovery_week {
      (SlotType::Recovery, "recovery_run", Zone::Z1)
    } else {
      (SlotType::Easy, "easy_run", Zone::Z2)
    };

    let count = empty.len();
    let per_day = (remaining / count as f64).round();
    for (n, &day) in empty.iter().enumerate() {
      let share = if n + 1 == count {
        remaining - per_day * (count - 1) as f64
      } else {
        per_day
      };
      let distance = share.max(config.min_filler_distance);
      slots[day] = Some(DaySlot::session(dates[day], slot_type, label, distance, zone));
    }
  } else if !empty.is_empty() {
    tracing::debug!(
      week = week.week_number,
      remaining,
      "no volume left for filler days, scheduling rest"
    );
  }

  std::array::from_fn(|day| slots[day].take().unwrap_or_else(|| DaySlot::rest(dates[day])))
}

/// Rest days seeded from availability: two at five days or fewer, Monday only at six
fn rest_days(availability_days_per_week: u32) -> &'static [usize] {
  match availability_days_per_week {
    0..=5 => &[MONDAY, FRIDAY],
    6 => &[MONDAY],
    _ => &[],
  }
}

fn race_week(dates: &[NaiveDate; 7]) -> [DaySlot; 7] {
  std::array::from_fn(|day| match day {
    TUESDAY => DaySlot::session(dates[day], SlotType::Easy, "shakeout_run", TUESDAY_SHAKEOUT, Zone::Z2),
    THURSDAY => DaySlot::session(dates[day], SlotType::Easy, "shakeout_run", THURSDAY_SHAKEOUT, Zone::Z2),
    SUNDAY => DaySlot {
      date: dates[day],
      slot_type: SlotType::Race,
      label: "race_day".to_string(),
      distance: 0.0,
      intensity_zone: None,
    },
    _ => DaySlot::rest(dates[day]),
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
