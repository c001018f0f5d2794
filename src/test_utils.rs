//! Test utilities and helpers
//!
//! This module provides common test infrastructure including:
//! - Mock data factories
//! - A fixed reference instant so plans are reproducible
//! - Helper assertions

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

use crate::models::{ReadinessSnapshot, UserProfile, WorkoutRecord, WorkoutType};

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Monday 2024-06-03, 06:00 UTC
pub fn reference_now() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 6, 3, 6, 0, 0).unwrap()
}

pub fn reference_week_start() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

/// Create a DateTime N days before the reference instant
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  reference_now() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_user_profile() -> UserProfile {
  let zones = [
    ("z1", "<114"),
    ("z2", "114-132"),
    ("z3", "133-151"),
    ("z4", "152-170"),
    ("z5", "171+"),
  ]
  .into_iter()
  .map(|(k, v)| (k.to_string(), v.to_string()))
  .collect();

  UserProfile {
    id: "athlete-1".to_string(),
    baseline_rhr: 60,
    zones,
  }
}

/// Create a workout `days_ago` days before the reference instant
pub fn mock_workout(
  workout_type: &str,
  days_ago: i64,
  duration_min: f64,
  zones: &[(&str, f64)],
) -> WorkoutRecord {
  let workout_type = match workout_type {
    "run" => WorkoutType::Run,
    "strength" => WorkoutType::Strength,
    other => WorkoutType::Other(other.to_string()),
  };
  let time_in_zones = if zones.is_empty() {
    None
  } else {
    Some(
      zones
        .iter()
        .map(|(zone, minutes)| (zone.to_string(), *minutes))
        .collect::<BTreeMap<_, _>>(),
    )
  };

  WorkoutRecord {
    workout_type,
    start_time: datetime_days_ago(days_ago),
    duration_min,
    time_in_zones,
  }
}

/// One easy 60 minute run on each of the given days
pub fn mock_run_days(days_ago: &[i64]) -> Vec<WorkoutRecord> {
  days_ago
    .iter()
    .map(|d| mock_workout("run", *d, 60.0, &[]))
    .collect()
}

pub fn mock_readiness(readiness_score: i64, sleep_hours: f64, rhr: i64) -> ReadinessSnapshot {
  ReadinessSnapshot {
    readiness_score,
    sleep_hours,
    rhr,
    date: None,
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Datelike, Weekday};

  #[test]
  fn test_reference_week_starts_on_monday() {
    assert_eq!(reference_week_start().weekday(), Weekday::Mon);
    assert_eq!(reference_now().date_naive(), reference_week_start());
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let user = mock_user_profile();
    assert_eq!(user.zones.len(), 5);
    assert_eq!(user.baseline_rhr, 60);

    let workout = mock_workout("run", 3, 30.0, &[("z2", 20.0)]);
    assert_eq!(workout.workout_type, WorkoutType::Run);
    assert_eq!((reference_now() - workout.start_time).num_days(), 3);
    assert_eq!(workout.zoned_minutes(), 20.0);

    let strength = mock_workout("strength", 0, 45.0, &[]);
    assert!(strength.time_in_zones.is_none());

    assert_eq!(mock_run_days(&[1, 2, 3]).len(), 3);
  }
}
