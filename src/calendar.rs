//! Week bucketing
//!
//! Weeks start on Monday, 00:00 UTC, regardless of locale. Bucket keys are the
//! ISO-8601 date of that Monday so time-of-day never leaks into a key.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

/// Monday 00:00 UTC of the week containing `instant`
pub fn week_start(instant: DateTime<Utc>) -> DateTime<Utc> {
  week_start_date(instant.date_naive())
    .and_time(NaiveTime::MIN)
    .and_utc()
}

/// Monday of the week containing `date`
pub fn week_start_date(date: NaiveDate) -> NaiveDate {
  date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Bucket key (`YYYY-MM-DD` of the Monday) for the week containing `instant`
pub fn week_key(instant: DateTime<Utc>) -> String {
  week_start(instant).format("%Y-%m-%d").to_string()
}

/// Whole days from `from` to `to` (negative when `to` is earlier)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
  (to - from).num_days()
}

/// Today's UTC calendar date
pub fn today_utc() -> NaiveDate {
  Utc::now().date_naive()
}
