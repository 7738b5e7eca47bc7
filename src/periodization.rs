//! Periodized Race Plan Generator
//!
//! Turns a race date and a current weekly volume into four phases and a
//! week-by-week plan:
//! - preparation (15% of weeks), 1.0x -> 1.1x volume
//! - endurance (35%), 1.1x -> 1.3x
//! - specific prep (35%), 1.3x -> 1.45x (peak)
//! - taper (remainder), 0.8x peak -> 0.5x current
//!
//! Recovery weeks are inserted every 3rd week (4th in phases longer than 8
//! weeks) at 65% volume. A synthetic race-day entry closes the plan.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{days_between, today_utc, week_start_date};
use crate::config::PlanConfig;
use crate::models::Plan;

const PREPARATION_SHARE: f64 = 0.15;
const ENDURANCE_SHARE: f64 = 0.35;
const SPECIFIC_PREP_SHARE: f64 = 0.35;

const PEAK_MULTIPLIER: f64 = 1.45;
const RECOVERY_WEEK_SCALE: f64 = 0.65;
const LONG_RUN_SHARE: f64 = 0.3;

/// Plans never get shorter than this, whatever the config says
const ABSOLUTE_MIN_WEEKS: u32 = 4;

// ---------------------------------------------------------------------------
/// Phase Key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKey {
    Preparation,
    Endurance,
    SpecificPrep,
    Taper,
    /// Only ever used by the synthetic race-day entry
    Race,
}

impl PhaseKey {
    /// The four training phases, in plan order
    pub const TRAINING: [PhaseKey; 4] = [
        PhaseKey::Preparation,
        PhaseKey::Endurance,
        PhaseKey::SpecificPrep,
        PhaseKey::Taper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preparation => "preparation",
            Self::Endurance => "endurance",
            Self::SpecificPrep => "specificPrep",
            Self::Taper => "taper",
            Self::Race => "race",
        }
    }

    /// Phases where back-to-back long weekends are scheduled
    pub fn allows_back_to_back(&self) -> bool {
        matches!(self, Self::Endurance | Self::SpecificPrep)
    }

    /// Key workouts cycled through on non-recovery weeks
    fn workout_rotation(&self) -> &'static [KeyWorkout] {
        match self {
            Self::Preparation => &[KeyWorkout::Strides, KeyWorkout::Fartlek, KeyWorkout::HillSprints],
            Self::Endurance => &[
                KeyWorkout::TempoRun,
                KeyWorkout::HillRepeats,
                KeyWorkout::ProgressionRun,
            ],
            Self::SpecificPrep => &[
                KeyWorkout::RacePaceRun,
                KeyWorkout::ThresholdIntervals,
                KeyWorkout::VerticalRepeats,
            ],
            Self::Taper => &[KeyWorkout::RacePaceSharpener, KeyWorkout::Strides],
            Self::Race => &[KeyWorkout::RaceDay],
        }
    }
}

impl std::fmt::Display for PhaseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
/// Key Workout and Week Note labels (translation keys, never display text)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyWorkout {
    Strides,
    Fartlek,
    HillSprints,
    TempoRun,
    HillRepeats,
    ProgressionRun,
    RacePaceRun,
    ThresholdIntervals,
    VerticalRepeats,
    RacePaceSharpener,
    RecoveryWeek,
    RaceDay,
}

impl KeyWorkout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strides => "strides",
            Self::Fartlek => "fartlek",
            Self::HillSprints => "hill_sprints",
            Self::TempoRun => "tempo_run",
            Self::HillRepeats => "hill_repeats",
            Self::ProgressionRun => "progression_run",
            Self::RacePaceRun => "race_pace_run",
            Self::ThresholdIntervals => "threshold_intervals",
            Self::VerticalRepeats => "vertical_repeats",
            Self::RacePaceSharpener => "race_pace_sharpener",
            Self::RecoveryWeek => "recovery_week",
            Self::RaceDay => "race_day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekNote {
    /// Long run Sunday paired with a medium-long Saturday
    BackToBackLongWeekend,
    RecoveryWeek,
}

// ---------------------------------------------------------------------------
/// Plan Structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub key: PhaseKey,
    pub week_count: u32,
    pub start_volume: f64,
    pub end_volume: f64,
}

impl Phase {
    /// Interpolated volume for 0-based week `index` within the phase
    fn ramp_volume(&self, index: u32) -> f64 {
        if self.week_count <= 1 {
            return self.start_volume;
        }
        let fraction = index as f64 / (self.week_count - 1) as f64;
        self.start_volume + (self.end_volume - self.start_volume) * fraction
    }

    /// Every 3rd week is a recovery week (every 4th once the phase exceeds 8 weeks).
    /// Phases of one or two weeks never get one.
    fn is_recovery_week(&self, index: u32) -> bool {
        let cycle = if self.week_count > 8 { 4 } else { 3 };
        self.week_count > 2 && index > 0 && (index + 1) % cycle == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPlan {
    /// 1-based position in the plan
    pub week_number: u32,
    /// Monday of the week; the race entry carries the race date itself
    pub date: NaiveDate,
    pub phase: PhaseKey,
    /// Planned weekly distance (km)
    pub volume: f64,
    /// Sunday long run (km)
    pub long_run: f64,
    pub workout_key: KeyWorkout,
    pub is_recovery_week: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<WeekNote>,
    pub is_current_week: bool,
}

impl WeekPlan {
    pub fn is_race(&self) -> bool {
        self.phase == PhaseKey::Race
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KoopPlan {
    /// Training weeks followed by the race-day entry
    pub weeks: Vec<WeekPlan>,
    pub phases: Vec<Phase>,
    pub total_weeks: u32,
    pub peak_volume: f64,
}

impl KoopPlan {
    /// The week containing today, if the plan has started
    pub fn current_week(&self) -> Option<&WeekPlan> {
        self.weeks.iter().find(|w| w.is_current_week)
    }

    /// Week by 1-based number (the race entry is `total_weeks + 1`)
    pub fn week(&self, week_number: u32) -> Option<&WeekPlan> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    /// Training weeks only, without the race entry
    pub fn training_weeks(&self) -> &[WeekPlan] {
        let len = self.weeks.len().saturating_sub(1);
        &self.weeks[..len]
    }
}

// ---------------------------------------------------------------------------
/// Plan Generation
// ---------------------------------------------------------------------------

/// Generate the plan relative to today (UTC) with default parameters
pub fn compute_koop_plan(plan: &Plan) -> KoopPlan {
    compute_koop_plan_as_of(plan, today_utc(), &PlanConfig::default())
}

/// Generate the plan relative to `today`
pub fn compute_koop_plan_as_of(plan: &Plan, today: NaiveDate, config: &PlanConfig) -> KoopPlan {
    let current_volume = plan.effective_volume(config.default_weekly_volume);
    if plan.current_weekly_volume != Some(current_volume) {
        tracing::warn!(
            given = ?plan.current_weekly_volume,
            used = current_volume,
            "plan has no usable weekly volume, using default"
        );
    }

    let days_until = days_between(today, plan.race_date);
    if days_until < 0 {
        tracing::warn!(race_date = %plan.race_date, %today, "race date already passed");
    }
    let total_weeks = total_weeks(days_until, config.min_weeks);

    let phases = split_phases(total_weeks, current_volume);
    let first_monday = week_start_date(today);

    let mut weeks = Vec::with_capacity(total_weeks as usize + 1);
    let mut offset = 0u32;
    for phase in &phases {
        for index in 0..phase.week_count {
            let date = first_monday + Duration::weeks(offset as i64);
            weeks.push(build_week(phase, index, offset + 1, date, today, plan.pair_long_run_weekends));
            offset += 1;
        }
    }

    weeks.push(WeekPlan {
        week_number: total_weeks + 1,
        date: plan.race_date,
        phase: PhaseKey::Race,
        volume: 0.0,
        long_run: 0.0,
        workout_key: KeyWorkout::RaceDay,
        is_recovery_week: false,
        notes: None,
        is_current_week: contains(plan.race_date, today),
    });

    tracing::debug!(total_weeks, current_volume, "generated periodized plan");

    KoopPlan {
        weeks,
        phases,
        total_weeks,
        peak_volume: (current_volume * PEAK_MULTIPLIER).round(),
    }
}

/// ceil(days / 7), never below the minimum plan length
fn total_weeks(days_until: i64, configured_min: u32) -> u32 {
    let min_weeks = configured_min.max(ABSOLUTE_MIN_WEEKS) as i64;
    let weeks = (days_until + 6).div_euclid(7);
    weeks.max(min_weeks) as u32
}

fn split_phases(total_weeks: u32, current: f64) -> Vec<Phase> {
    let share = |fraction: f64| ((total_weeks as f64 * fraction).floor() as u32).max(1);
    let preparation = share(PREPARATION_SHARE);
    let endurance = share(ENDURANCE_SHARE);
    let specific = share(SPECIFIC_PREP_SHARE);
    let taper = total_weeks.saturating_sub(preparation + endurance + specific);

    let peak = current * PEAK_MULTIPLIER;
    let counts = [preparation, endurance, specific, taper];
    let ramps = [
        (current, current * 1.1),
        (current * 1.1, current * 1.3),
        (current * 1.3, peak),
        (peak * 0.8, current * 0.5),
    ];

    PhaseKey::TRAINING
        .iter()
        .zip(counts)
        .zip(ramps)
        .map(|((key, week_count), (start_volume, end_volume))| Phase {
            key: *key,
            week_count,
            start_volume,
            end_volume,
        })
        .collect()
}

fn build_week(
    phase: &Phase,
    index: u32,
    week_number: u32,
    date: NaiveDate,
    today: NaiveDate,
    pair_long_run_weekends: bool,
) -> WeekPlan {
    let is_recovery_week = phase.is_recovery_week(index);

    let mut volume = phase.ramp_volume(index);
    if is_recovery_week {
        volume *= RECOVERY_WEEK_SCALE;
    }
    let volume = volume.max(0.0).round();

    let workout_key = if is_recovery_week {
        KeyWorkout::RecoveryWeek
    } else {
        let rotation = phase.key.workout_rotation();
        rotation[index as usize % rotation.len()]
    };

    let notes = if pair_long_run_weekends
        && phase.key.allows_back_to_back()
        && !is_recovery_week
        && index > 0
    {
        Some(WeekNote::BackToBackLongWeekend)
    } else if is_recovery_week {
        Some(WeekNote::RecoveryWeek)
    } else {
        None
    };

    WeekPlan {
        week_number,
        date,
        phase: phase.key,
        volume,
        long_run: (volume * LONG_RUN_SHARE).round(),
        workout_key,
        is_recovery_week,
        notes,
        is_current_week: contains(date, today),
    }
}

/// `today` falls in [start, start + 7 days)
fn contains(start: NaiveDate, today: NaiveDate) -> bool {
    today >= start && today < start + Duration::days(7)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
