/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------
///
/// The engine itself never fails on bad data; only configuration loading does.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value:?} ({reason})")]
  InvalidValue {
    key: String,
    value: String,
    reason: String,
  },

  #[error("Failed to parse config JSON: {0}")]
  Json(#[from] serde_json::Error),
}

impl ConfigError {
  pub(crate) fn invalid(key: &str, value: &str, reason: &str) -> Self {
    ConfigError::InvalidValue {
      key: key.to_string(),
      value: value.to_string(),
      reason: reason.to_string(),
    }
  }
}
