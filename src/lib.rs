pub mod calendar;
pub mod config;
pub mod context;
pub mod error;
pub mod insights;
pub mod load;
pub mod models;
pub mod periodization;
pub mod schedule;
pub mod summary;

#[cfg(test)]
mod test_utils;

pub use config::{CalendarConfig, EngineConfig, LoadConfig, PlanConfig};
pub use context::{CoachContext, DashboardInput};
pub use error::ConfigError;
pub use insights::{generate_coaching_insights, generate_coaching_insights_as_of, Insight, InsightInput, InsightKind};
pub use load::{compute_training_load, compute_training_load_as_of, FormBand, LoadPoint, LoadSnapshot};
pub use models::{Activity, CheckIn, Plan};
pub use periodization::{compute_koop_plan, compute_koop_plan_as_of, KoopPlan, PhaseKey, WeekPlan};
pub use schedule::{compute_weekly_calendar, compute_weekly_calendar_with, DaySlot, SlotType, Zone};
