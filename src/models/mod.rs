pub mod activity;
pub mod checkin;
pub mod plan;

pub use activity::Activity;
pub use checkin::CheckIn;
pub use plan::Plan;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept numbers, numeric strings, null, or a missing field.
/// Anything else (including negative or non-finite values) loads as `None`
/// so a single corrupt record degrades to a zero contribution.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.and_then(|v| parse_number(&v)).filter(|n| n.is_finite() && *n >= 0.0))
}

/// 1-5 questionnaire score. Out-of-range numbers are clamped, garbage is dropped.
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(
    value
      .and_then(|v| parse_number(&v))
      .filter(|n| n.is_finite())
      .map(|n| n.round().clamp(1.0, 5.0) as u8),
  )
}

fn parse_number(value: &Value) -> Option<f64> {
  match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Deserialize)]
  struct Probe {
    #[serde(default, deserialize_with = "lenient_f64")]
    value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    score: Option<u8>,
  }

  fn probe(json: &str) -> Probe {
    serde_json::from_str(json).expect("probe should always deserialize")
  }

  #[test]
  fn test_lenient_f64_accepts_numbers_and_numeric_strings() {
    assert_eq!(probe(r#"{"value": 12.5}"#).value, Some(12.5));
    assert_eq!(probe(r#"{"value": "42"}"#).value, Some(42.0));
    assert_eq!(probe(r#"{"value": " 7.25 "}"#).value, Some(7.25));
  }

  #[test]
  fn test_lenient_f64_degrades_garbage_to_none() {
    assert_eq!(probe(r#"{}"#).value, None);
    assert_eq!(probe(r#"{"value": null}"#).value, None);
    assert_eq!(probe(r#"{"value": "fast"}"#).value, None);
    assert_eq!(probe(r#"{"value": [1, 2]}"#).value, None);
    assert_eq!(probe(r#"{"value": -30}"#).value, None);
  }

  #[test]
  fn test_lenient_score_clamps_to_scale() {
    assert_eq!(probe(r#"{"score": 4}"#).score, Some(4));
    assert_eq!(probe(r#"{"score": 9}"#).score, Some(5));
    assert_eq!(probe(r#"{"score": 0}"#).score, Some(1));
    assert_eq!(probe(r#"{"score": "3.6"}"#).score, Some(4));
    assert_eq!(probe(r#"{"score": true}"#).score, None);
  }
}
