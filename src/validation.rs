//! Input validation for the plan engine
//!
//! Malformed numeric input is rejected, never clamped. Zone minutes that add
//! up to more than the workout duration are only reported as a warning.

use tracing::warn;

use crate::models::{HrZone, ReadinessSnapshot, UserProfile, WorkoutRecord};

const MAX_SLEEP_HOURS: f64 = 24.0;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ValidationError {
  #[error("Workout {index}: duration_min must be a positive number, got {value}")]
  InvalidDuration { index: usize, value: f64 },

  #[error("Workout {index}: minutes in {zone} must be a non-negative number, got {value}")]
  InvalidZoneMinutes { index: usize, zone: String, value: f64 },

  #[error("Workout {index}: unknown zone label '{zone}'")]
  UnknownZone { index: usize, zone: String },

  #[error("readiness_score must be within 0-100, got {0}")]
  InvalidReadinessScore(i64),

  #[error("sleep_hours must be within 0-24, got {0}")]
  InvalidSleepHours(f64),

  #[error("{field} must be a positive heart rate, got {value}")]
  InvalidHeartRate { field: &'static str, value: i64 },

  #[error("Invalid profile zones: {0}")]
  InvalidZones(String),
}

/// Validate the profile: positive baseline and, when zones are present,
/// exactly z1..z5 with strictly increasing lower bounds.
pub fn validate_profile(user: &UserProfile) -> Result<(), ValidationError> {
  if user.baseline_rhr <= 0 {
    return Err(ValidationError::InvalidHeartRate {
      field: "baseline_rhr",
      value: user.baseline_rhr,
    });
  }

  // Zones are presentation-only; an empty map means "not supplied"
  if user.zones.is_empty() {
    return Ok(());
  }

  if user.zones.len() != HrZone::ALL.len() {
    return Err(ValidationError::InvalidZones(format!(
      "expected 5 zones, got {}",
      user.zones.len()
    )));
  }

  let mut previous: Option<(HrZone, i64)> = None;
  for zone in HrZone::ALL {
    let range = user
      .zones
      .get(zone.as_str())
      .ok_or_else(|| ValidationError::InvalidZones(format!("missing {}", zone)))?;
    let lower = zone_lower_bound(range)
      .ok_or_else(|| ValidationError::InvalidZones(format!("unreadable range for {}: '{}'", zone, range)))?;

    if let Some((prev_zone, prev_lower)) = previous {
      if lower <= prev_lower {
        return Err(ValidationError::InvalidZones(format!(
          "{} lower bound {} does not exceed {} lower bound {}",
          zone, lower, prev_zone, prev_lower
        )));
      }
    }
    previous = Some((zone, lower));
  }

  Ok(())
}

/// Lower bound of a display range: `"<114"` → 0, `"114-132"` → 114, `"171+"` → 171
fn zone_lower_bound(range: &str) -> Option<i64> {
  let range = range.trim();
  if range.starts_with('<') {
    return Some(0);
  }
  let digits: String = range.chars().take_while(|c| c.is_ascii_digit()).collect();
  digits.parse().ok()
}

pub fn validate_workouts(workouts: &[WorkoutRecord]) -> Result<(), ValidationError> {
  for (index, workout) in workouts.iter().enumerate() {
    if !workout.duration_min.is_finite() || workout.duration_min <= 0.0 {
      return Err(ValidationError::InvalidDuration {
        index,
        value: workout.duration_min,
      });
    }

    if let Some(zones) = &workout.time_in_zones {
      for (label, minutes) in zones {
        if label.parse::<HrZone>().is_err() {
          return Err(ValidationError::UnknownZone {
            index,
            zone: label.clone(),
          });
        }
        if !minutes.is_finite() || *minutes < 0.0 {
          return Err(ValidationError::InvalidZoneMinutes {
            index,
            zone: label.clone(),
            value: *minutes,
          });
        }
      }

      let zoned = workout.zoned_minutes();
      if zoned > workout.duration_min {
        warn!(
          index,
          zoned_minutes = zoned,
          duration_min = workout.duration_min,
          "zone minutes exceed workout duration"
        );
      }
    }
  }

  Ok(())
}

pub fn validate_readiness(readiness: &ReadinessSnapshot) -> Result<(), ValidationError> {
  if !(0..=100).contains(&readiness.readiness_score) {
    return Err(ValidationError::InvalidReadinessScore(readiness.readiness_score));
  }
  if !readiness.sleep_hours.is_finite()
    || readiness.sleep_hours < 0.0
    || readiness.sleep_hours > MAX_SLEEP_HOURS
  {
    return Err(ValidationError::InvalidSleepHours(readiness.sleep_hours));
  }
  if readiness.rhr <= 0 {
    return Err(ValidationError::InvalidHeartRate {
      field: "rhr",
      value: readiness.rhr,
    });
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
