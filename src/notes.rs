//! Advisory notes surfaced alongside the plan

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::models::ReadinessSnapshot;
use crate::readiness::{ReadinessAssessment, ReadinessTier};
use crate::workload::WorkloadSummary;

/// Conditions that produce a note, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
  HighInjuryRisk { acwr: f64, threshold: f64 },
  LowTrainingStimulus { acwr: f64, threshold: f64 },
  LowReadiness { readiness_score: i64 },
  InsufficientSleep { sleep_hours: f64, threshold: f64 },
}

impl Advisory {
  /// Check every trigger independently; all that fire are kept
  pub fn detect(
    workload: &WorkloadSummary,
    readiness: &ReadinessAssessment,
    snapshot: &ReadinessSnapshot,
    config: &PlannerConfig,
  ) -> Vec<Self> {
    let mut advisories = Vec::new();

    if workload.raw_acwr > config.workload.high_risk_above {
      advisories.push(Advisory::HighInjuryRisk {
        acwr: workload.acwr,
        threshold: config.workload.high_risk_above,
      });
    }
    if workload.raw_acwr < config.workload.undertraining_below {
      advisories.push(Advisory::LowTrainingStimulus {
        acwr: workload.acwr,
        threshold: config.workload.undertraining_below,
      });
    }
    if readiness.tier == ReadinessTier::Low {
      advisories.push(Advisory::LowReadiness {
        readiness_score: snapshot.readiness_score,
      });
    }
    if snapshot.sleep_hours < config.readiness.short_sleep_below {
      advisories.push(Advisory::InsufficientSleep {
        sleep_hours: snapshot.sleep_hours,
        threshold: config.readiness.short_sleep_below,
      });
    }

    advisories
  }

  pub fn message(&self) -> String {
    match self {
      Advisory::HighInjuryRisk { acwr, threshold } => format!(
        "Elevated injury risk: ACWR {:.2} is above {:.1}. Tempo and interval sessions this week have been downgraded to easy running.",
        acwr, threshold
      ),
      Advisory::LowTrainingStimulus { acwr, threshold } => format!(
        "Training load is below the optimal stimulus: ACWR {:.2} is under {:.1}. Build volume gradually.",
        acwr, threshold
      ),
      Advisory::LowReadiness { readiness_score } => format!(
        "Low readiness (score {}): prioritize extra recovery. An upcoming session has been swapped for active recovery.",
        readiness_score
      ),
      Advisory::InsufficientSleep { sleep_hours, threshold } => format!(
        "Insufficient sleep: {:.1}h is below {:.0}h and is likely contributing to reduced recovery.",
        sleep_hours, threshold
      ),
    }
  }
}

/// Human-readable notes, empty when nothing fired
pub fn generate_notes(
  workload: &WorkloadSummary,
  readiness: &ReadinessAssessment,
  snapshot: &ReadinessSnapshot,
  config: &PlannerConfig,
) -> Vec<String> {
  Advisory::detect(workload, readiness, snapshot, config)
    .iter()
    .map(Advisory::message)
    .collect()
}
