//! Acute:chronic workload ratio
//!
//! Each workout is reduced to a load number (raw or zone-weighted minutes).
//! Acute load is the sum over the last 7 days; chronic load is the weekly
//! average over the last 28. The ratio is the injury-risk proxy the planner
//! works from.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LoadProxy, WorkloadConfig};
use crate::models::{HrZone, WorkoutRecord};

/// ---------------------------------------------------------------------------
/// Risk Bands
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
  /// Below the undertraining threshold (0.8)
  Undertraining,
  /// 0.8 - 1.3
  Optimal,
  /// 1.3 - 1.5
  Elevated,
  /// Above 1.5: intensity must be curtailed
  HighRisk,
}

impl RiskBand {
  pub fn from_acwr(acwr: f64, config: &WorkloadConfig) -> Self {
    if acwr < config.undertraining_below {
      RiskBand::Undertraining
    } else if acwr <= config.elevated_above {
      RiskBand::Optimal
    } else if acwr <= config.high_risk_above {
      RiskBand::Elevated
    } else {
      RiskBand::HighRisk
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      RiskBand::Undertraining => "undertraining",
      RiskBand::Optimal => "optimal",
      RiskBand::Elevated => "elevated",
      RiskBand::HighRisk => "high_risk",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Per-Workout Load
/// ---------------------------------------------------------------------------

/// Load contributed by one workout
pub fn workout_load(workout: &WorkoutRecord, config: &WorkloadConfig) -> f64 {
  match (config.load_proxy, &workout.time_in_zones) {
    (LoadProxy::ZoneWeighted, Some(zones)) => {
      let weights = &config.zone_weights;
      let zoned: f64 = zones
        .iter()
        .filter_map(|(label, minutes)| {
          label
            .parse::<HrZone>()
            .ok()
            .map(|zone| minutes * weights.weight(zone))
        })
        .sum();
      // Inconsistent zone data (more zoned minutes than duration) leaves no remainder
      let remainder = (workout.duration_min - workout.zoned_minutes()).max(0.0);
      zoned + remainder * weights.unzoned
    }
    _ => workout.duration_min,
  }
}

/// ---------------------------------------------------------------------------
/// Workload Summary
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSummary {
  /// Load over the acute window
  pub acute_load: f64,
  /// Average weekly load over the chronic window; 0 without a baseline
  pub chronic_load: f64,
  /// Ratio rounded to two decimals for display
  pub acwr: f64,
  /// Unrounded ratio; bands and notes are judged on this
  pub raw_acwr: f64,
  pub risk_band: RiskBand,
  /// Workouts that fell inside the chronic window
  pub workouts_considered: usize,
}

impl WorkloadSummary {
  /// Compute the workload ratio as of `as_of`, or as of the most recent
  /// workout when no reference instant is given.
  pub fn compute(
    workouts: &[WorkoutRecord],
    as_of: Option<DateTime<Utc>>,
    config: &WorkloadConfig,
  ) -> Self {
    let anchor = match as_of.or_else(|| workouts.iter().map(|w| w.start_time).max()) {
      Some(anchor) => anchor,
      None => return Self::neutral(config),
    };

    let acute_window = Duration::days(config.acute_days);
    let chronic_window = Duration::days(config.chronic_days);

    let mut acute_sum = 0.0;
    let mut baseline_sum = 0.0; // chronic window, before the acute window
    let mut considered = 0;

    for workout in workouts {
      let age = anchor - workout.start_time;
      if age < Duration::zero() || age >= chronic_window {
        continue;
      }

      let load = workout_load(workout, config);
      considered += 1;
      if age < acute_window {
        acute_sum += load;
      } else {
        baseline_sum += load;
      }
    }

    // Nothing before the acute window means there is no chronic baseline yet
    let chronic_load = if baseline_sum > 0.0 {
      (acute_sum + baseline_sum) / config.chronic_weeks()
    } else {
      0.0
    };

    let raw_acwr = if chronic_load > 0.0 {
      acute_sum / chronic_load
    } else {
      config.neutral_acwr
    };

    let summary = Self {
      acute_load: round1(acute_sum),
      chronic_load: round1(chronic_load),
      acwr: round2(raw_acwr),
      raw_acwr,
      risk_band: RiskBand::from_acwr(raw_acwr, config),
      workouts_considered: considered,
    };

    debug!(
      anchor = %anchor,
      acute_load = summary.acute_load,
      chronic_load = summary.chronic_load,
      acwr = summary.raw_acwr,
      risk_band = summary.risk_band.as_str(),
      "computed workload ratio"
    );

    summary
  }

  fn neutral(config: &WorkloadConfig) -> Self {
    Self {
      acute_load: 0.0,
      chronic_load: 0.0,
      acwr: config.neutral_acwr,
      raw_acwr: config.neutral_acwr,
      risk_band: RiskBand::from_acwr(config.neutral_acwr, config),
      workouts_considered: 0,
    }
  }
}

fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
