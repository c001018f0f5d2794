use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Readiness score used when no live reading is available
pub const DEFAULT_READINESS_SCORE: i64 = 75;
/// Sleep duration (hours) used when no live reading is available
pub const DEFAULT_SLEEP_HOURS: f64 = 7.0;
/// Morning resting heart rate used when no live reading is available
pub const DEFAULT_RHR: i64 = 58;

/// One morning's recovery signals, as handed to the plan engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSnapshot {
  /// Composite 0-100 score, higher = more recovered
  pub readiness_score: i64,
  pub sleep_hours: f64,
  /// Morning resting heart rate (bpm)
  pub rhr: i64,
  /// Day the readings belong to, when known
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date: Option<NaiveDate>,
}

/// Named fallback values for missing readiness signals.
///
/// Injected by the caller; the engine itself never substitutes defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessDefaults {
  pub readiness_score: i64,
  pub sleep_hours: f64,
  pub rhr: i64,
}

impl Default for ReadinessDefaults {
  fn default() -> Self {
    Self {
      readiness_score: DEFAULT_READINESS_SCORE,
      sleep_hours: DEFAULT_SLEEP_HOURS,
      rhr: DEFAULT_RHR,
    }
  }
}

impl ReadinessDefaults {
  /// A snapshot made entirely of fallback values
  pub fn snapshot(&self) -> ReadinessSnapshot {
    ReadinessSnapshot {
      readiness_score: self.readiness_score,
      sleep_hours: self.sleep_hours,
      rhr: self.rhr,
      date: None,
    }
  }
}
