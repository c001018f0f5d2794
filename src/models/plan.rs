use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::profile::HrZone;
use crate::readiness::ReadinessTier;
use crate::workload::RiskBand;

/// ---------------------------------------------------------------------------
/// Session Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
  LongRun,
  EasyRun,
  TempoRun,
  IntervalRun,
  Strength,
  ActiveRecovery,
  Rest,
}

impl SessionType {
  pub fn as_str(&self) -> &'static str {
    match self {
      SessionType::LongRun => "long_run",
      SessionType::EasyRun => "easy_run",
      SessionType::TempoRun => "tempo_run",
      SessionType::IntervalRun => "interval_run",
      SessionType::Strength => "strength",
      SessionType::ActiveRecovery => "active_recovery",
      SessionType::Rest => "rest",
    }
  }

  /// Tempo and interval work
  pub fn is_quality(&self) -> bool {
    matches!(self, SessionType::TempoRun | SessionType::IntervalRun)
  }

  /// Sessions that carry real training stress
  pub fn is_hard(&self) -> bool {
    self.is_quality() || *self == SessionType::LongRun
  }

  pub fn is_recovery(&self) -> bool {
    matches!(self, SessionType::ActiveRecovery | SessionType::Rest)
  }
}

impl std::fmt::Display for SessionType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Plan Output
/// ---------------------------------------------------------------------------

/// Session parameters a client needs to render one day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayDetails {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub target_zones: Vec<HrZone>,

  /// Planned session length; 0 on rest days
  pub duration_min: u32,

  /// Planned minutes per zone label
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub zone_minutes: BTreeMap<String, u32>,

  /// Display HR range for the primary zone, from the user's profile
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_hr: Option<String>,

  /// Strength focus area
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub focus: Option<String>,

  /// Template session this day was downgraded from
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub adjusted_from: Option<SessionType>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
  /// ISO date, or weekday name when no week start was supplied
  pub day: String,
  pub weekday: String,
  pub session: SessionType,
  pub details: DayDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
  pub acwr: f64,
  pub risk_band: RiskBand,
  pub acute_load: f64,
  pub chronic_load: f64,
  /// Input readiness score, echoed for display
  pub readiness: i64,
  pub readiness_tier: ReadinessTier,
  pub sleep_hours: f64,
  pub plan: Vec<DayPlan>,
  pub notes: Vec<String>,
}

impl WeeklyPlan {
  /// Number of tempo/interval sessions in the week
  pub fn quality_session_count(&self) -> usize {
    self.plan.iter().filter(|d| d.session.is_quality()).count()
  }

  pub fn count(&self, session: SessionType) -> usize {
    self.plan.iter().filter(|d| d.session == session).count()
  }
}
