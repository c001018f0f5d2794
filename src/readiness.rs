//! Readiness classification
//!
//! Maps a morning snapshot onto a tier that caps the week's intensity. Any
//! single adverse signal pulls the tier down to `Low`; `High` needs every
//! signal to be favourable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ReadinessThresholds;
use crate::models::ReadinessSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessTier {
  Low,
  Moderate,
  High,
}

impl ReadinessTier {
  pub fn as_str(&self) -> &'static str {
    match self {
      ReadinessTier::Low => "low",
      ReadinessTier::Moderate => "moderate",
      ReadinessTier::High => "high",
    }
  }
}

/// Individual signals that pushed the tier to `Low`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdverseSignal {
  LowScore,
  ShortSleep,
  ElevatedRhr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessAssessment {
  pub tier: ReadinessTier,
  /// Morning RHR minus baseline (bpm)
  pub rhr_delta: i64,
  pub adverse_signals: Vec<AdverseSignal>,
}

/// Classify a readiness snapshot against the user's baseline resting HR
pub fn classify(
  readiness: &ReadinessSnapshot,
  baseline_rhr: i64,
  thresholds: &ReadinessThresholds,
) -> ReadinessAssessment {
  let rhr_delta = readiness.rhr - baseline_rhr;

  let mut adverse_signals = Vec::new();
  if readiness.readiness_score < thresholds.low_score_below {
    adverse_signals.push(AdverseSignal::LowScore);
  }
  if readiness.sleep_hours < thresholds.short_sleep_below {
    adverse_signals.push(AdverseSignal::ShortSleep);
  }
  if rhr_delta >= thresholds.rhr_elevation_bpm {
    adverse_signals.push(AdverseSignal::ElevatedRhr);
  }

  let tier = if !adverse_signals.is_empty() {
    ReadinessTier::Low
  } else if readiness.readiness_score >= thresholds.high_score_at_least
    && readiness.sleep_hours >= thresholds.rested_sleep_at_least
    && rhr_delta <= 0
  {
    ReadinessTier::High
  } else {
    ReadinessTier::Moderate
  };

  debug!(
    tier = tier.as_str(),
    readiness_score = readiness.readiness_score,
    sleep_hours = readiness.sleep_hours,
    rhr_delta,
    "classified readiness"
  );

  ReadinessAssessment {
    tier,
    rhr_delta,
    adverse_signals,
  }
}
