use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Workout modality. Unrecognised types are kept rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
  Run,
  Strength,
  #[serde(untagged)]
  Other(String),
}

impl WorkoutType {
  pub fn as_str(&self) -> &str {
    match self {
      WorkoutType::Run => "run",
      WorkoutType::Strength => "strength",
      WorkoutType::Other(other) => other,
    }
  }
}

/// A logged workout as handed over by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
  #[serde(rename = "type")]
  pub workout_type: WorkoutType,
  pub start_time: DateTime<Utc>,
  pub duration_min: f64,
  /// Minutes per zone label (`z1`..`z5`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub time_in_zones: Option<BTreeMap<String, f64>>,
}

impl WorkoutRecord {
  /// Total minutes recorded across all zones
  pub fn zoned_minutes(&self) -> f64 {
    self
      .time_in_zones
      .as_ref()
      .map(|zones| zones.values().sum())
      .unwrap_or(0.0)
  }
}
