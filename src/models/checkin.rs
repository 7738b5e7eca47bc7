use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient_score;

/// Subjective daily check-in. Scores run 1 (low) to 5 (high).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
  pub date: NaiveDate,
  #[serde(default, deserialize_with = "lenient_score")]
  pub fatigue: Option<u8>,
  #[serde(default, deserialize_with = "lenient_score")]
  pub sleep_quality: Option<u8>,
  #[serde(default, deserialize_with = "lenient_score")]
  pub motivation: Option<u8>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub niggles: Option<String>,
}

impl CheckIn {
  /// Niggle text with surrounding whitespace removed, None when blank
  pub fn niggle_text(&self) -> Option<&str> {
    self
      .niggles
      .as_deref()
      .map(str::trim)
      .filter(|text| !text.is_empty())
  }
}
