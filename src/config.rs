//! Tunable planner thresholds and readiness fallbacks
//!
//! Every numeric judgment call the engine makes lives here so callers can
//! inject their own policy. `Default` carries the documented values;
//! `from_env` layers `PLANNER_*` overrides on top.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::models::{HrZone, ReadinessDefaults};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {value}")]
  InvalidValue { var: String, value: String },

  #[error("Inconsistent thresholds: {0}")]
  InvalidThresholds(String),
}

/// ---------------------------------------------------------------------------
/// Workload
/// ---------------------------------------------------------------------------

/// How a single workout is turned into a load number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadProxy {
  RawDuration,
  ZoneWeighted,
}

impl FromStr for LoadProxy {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "raw_duration" => Ok(Self::RawDuration),
      "zone_weighted" => Ok(Self::ZoneWeighted),
      _ => Err(format!("Unknown load proxy: {}", s)),
    }
  }
}

/// Intensity multipliers applied to minutes spent in each zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneWeights {
  pub z1: f64,
  pub z2: f64,
  pub z3: f64,
  pub z4: f64,
  pub z5: f64,
  /// Applied to minutes not attributed to any zone
  pub unzoned: f64,
}

impl Default for ZoneWeights {
  fn default() -> Self {
    Self {
      z1: 1.0,
      z2: 1.2,
      z3: 1.5,
      z4: 1.8,
      z5: 2.0,
      unzoned: 1.0,
    }
  }
}

impl ZoneWeights {
  pub fn weight(&self, zone: HrZone) -> f64 {
    match zone {
      HrZone::Z1 => self.z1,
      HrZone::Z2 => self.z2,
      HrZone::Z3 => self.z3,
      HrZone::Z4 => self.z4,
      HrZone::Z5 => self.z5,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
  pub acute_days: i64,
  pub chronic_days: i64,
  /// ACWR below this is undertraining
  pub undertraining_below: f64,
  /// ACWR above this is elevated risk
  pub elevated_above: f64,
  /// ACWR above this is high risk; intensity is curtailed
  pub high_risk_above: f64,
  /// Ratio reported when there is no chronic baseline
  pub neutral_acwr: f64,
  pub load_proxy: LoadProxy,
  pub zone_weights: ZoneWeights,
}

impl Default for WorkloadConfig {
  fn default() -> Self {
    Self {
      acute_days: 7,
      chronic_days: 28,
      undertraining_below: 0.8,
      elevated_above: 1.3,
      high_risk_above: 1.5,
      neutral_acwr: 1.0,
      load_proxy: LoadProxy::ZoneWeighted,
      zone_weights: ZoneWeights::default(),
    }
  }
}

impl WorkloadConfig {
  /// Number of weeks the chronic window averages over
  pub fn chronic_weeks(&self) -> f64 {
    self.chronic_days as f64 / 7.0
  }
}

/// ---------------------------------------------------------------------------
/// Readiness
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessThresholds {
  /// Score below this is low
  pub low_score_below: i64,
  /// Score at or above this can be high
  pub high_score_at_least: i64,
  /// Sleep below this is low (and triggers the sleep note)
  pub short_sleep_below: f64,
  /// Sleep at or above this can be high
  pub rested_sleep_at_least: f64,
  /// rhr - baseline at or above this is low
  pub rhr_elevation_bpm: i64,
}

impl Default for ReadinessThresholds {
  fn default() -> Self {
    Self {
      low_score_below: 60,
      high_score_at_least: 80,
      short_sleep_below: 6.0,
      rested_sleep_at_least: 7.0,
      rhr_elevation_bpm: 5,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Planner Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
  pub workload: WorkloadConfig,
  pub readiness: ReadinessThresholds,
  pub defaults: ReadinessDefaults,
}

impl PlannerConfig {
  /// Build from defaults plus any `PLANNER_*` overrides in the environment
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    let w = &mut config.workload;
    override_from_env("PLANNER_ACUTE_DAYS", &mut w.acute_days)?;
    override_from_env("PLANNER_CHRONIC_DAYS", &mut w.chronic_days)?;
    override_from_env("PLANNER_ACWR_UNDERTRAINING", &mut w.undertraining_below)?;
    override_from_env("PLANNER_ACWR_ELEVATED", &mut w.elevated_above)?;
    override_from_env("PLANNER_ACWR_HIGH_RISK", &mut w.high_risk_above)?;
    override_from_env("PLANNER_LOAD_PROXY", &mut w.load_proxy)?;

    let r = &mut config.readiness;
    override_from_env("PLANNER_LOW_READINESS_SCORE", &mut r.low_score_below)?;
    override_from_env("PLANNER_HIGH_READINESS_SCORE", &mut r.high_score_at_least)?;
    override_from_env("PLANNER_SHORT_SLEEP_HOURS", &mut r.short_sleep_below)?;
    override_from_env("PLANNER_RESTED_SLEEP_HOURS", &mut r.rested_sleep_at_least)?;
    override_from_env("PLANNER_RHR_ELEVATION_BPM", &mut r.rhr_elevation_bpm)?;

    let d = &mut config.defaults;
    override_from_env("PLANNER_DEFAULT_READINESS_SCORE", &mut d.readiness_score)?;
    override_from_env("PLANNER_DEFAULT_SLEEP_HOURS", &mut d.sleep_hours)?;
    override_from_env("PLANNER_DEFAULT_RHR", &mut d.rhr)?;

    config.validate()?;
    Ok(config)
  }

  /// Check that thresholds are ordered and windows are usable
  pub fn validate(&self) -> Result<(), ConfigError> {
    let w = &self.workload;
    if w.acute_days <= 0 || w.chronic_days <= w.acute_days || w.chronic_days % 7 != 0 {
      return Err(ConfigError::InvalidThresholds(format!(
        "windows must satisfy 0 < acute ({}) < chronic ({}), chronic a multiple of 7",
        w.acute_days, w.chronic_days
      )));
    }
    if !(w.undertraining_below < w.elevated_above && w.elevated_above < w.high_risk_above) {
      return Err(ConfigError::InvalidThresholds(format!(
        "ACWR bands must increase: {} < {} < {}",
        w.undertraining_below, w.elevated_above, w.high_risk_above
      )));
    }

    let r = &self.readiness;
    if r.low_score_below > r.high_score_at_least {
      return Err(ConfigError::InvalidThresholds(format!(
        "low readiness score ({}) above high score ({})",
        r.low_score_below, r.high_score_at_least
      )));
    }
    if r.short_sleep_below > r.rested_sleep_at_least {
      return Err(ConfigError::InvalidThresholds(format!(
        "short sleep ({}) above rested sleep ({})",
        r.short_sleep_below, r.rested_sleep_at_least
      )));
    }

    Ok(())
  }
}

fn override_from_env<T: FromStr>(var: &str, target: &mut T) -> Result<(), ConfigError> {
  if let Ok(raw) = env::var(var) {
    *target = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
      var: var.to_string(),
      value: raw.clone(),
    })?;
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  fn test_defaults_are_consistent() {
    let config = PlannerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.workload.chronic_weeks(), 4.0);
    assert_eq!(config.defaults.readiness_score, 75);
    assert_eq!(config.defaults.sleep_hours, 7.0);
    assert_eq!(config.defaults.rhr, 58);
  }

  #[test]
  #[serial]
  fn test_from_env_without_overrides() {
    temp_env::with_vars_unset(
      ["PLANNER_ACWR_HIGH_RISK", "PLANNER_LOAD_PROXY", "PLANNER_DEFAULT_RHR"],
      || {
        let config = PlannerConfig::from_env().unwrap();
        assert_eq!(config, PlannerConfig::default());
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_applies_overrides() {
    temp_env::with_vars(
      [
        ("PLANNER_ACWR_HIGH_RISK", Some("1.6")),
        ("PLANNER_LOAD_PROXY", Some("raw_duration")),
        ("PLANNER_DEFAULT_RHR", Some("55")),
        ("PLANNER_SHORT_SLEEP_HOURS", Some(" 5.5 ")),
      ],
      || {
        let config = PlannerConfig::from_env().unwrap();
        assert_eq!(config.workload.high_risk_above, 1.6);
        assert_eq!(config.workload.load_proxy, LoadProxy::RawDuration);
        assert_eq!(config.defaults.rhr, 55);
        assert_eq!(config.readiness.short_sleep_below, 5.5);
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_unparseable_value() {
    temp_env::with_var("PLANNER_ACUTE_DAYS", Some("seven"), || {
      let err = PlannerConfig::from_env().unwrap_err();
      assert_eq!(
        err,
        ConfigError::InvalidValue {
          var: "PLANNER_ACUTE_DAYS".to_string(),
          value: "seven".to_string(),
        }
      );
    });
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_inverted_bands() {
    temp_env::with_var("PLANNER_ACWR_ELEVATED", Some("1.7"), || {
      let err = PlannerConfig::from_env().unwrap_err();
      assert!(matches!(err, ConfigError::InvalidThresholds(_)));
    });
  }

  #[test]
  fn test_chronic_window_must_be_whole_weeks() {
    let mut config = PlannerConfig::default();
    config.workload.chronic_days = 30;
    assert!(config.validate().is_err());

    config.workload.chronic_days = 42;
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_zone_weights_increase_with_intensity() {
    let weights = ZoneWeights::default();
    let values: Vec<f64> = HrZone::ALL.iter().map(|z| weights.weight(*z)).collect();
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
  }
}
