//! Weekly plan synthesis
//!
//! The week starts from a fixed template keyed by weekday, then two
//! adjustments are applied in order:
//! 1. High-risk ACWR: tempo/interval work becomes easy running and the long
//!    run is shortened.
//! 2. Low readiness: today (or the next hard session) becomes active recovery.
//!
//! The engine is a pure function of its inputs; it never reads the clock.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::PlannerConfig;
use crate::models::{
  DayDetails, DayPlan, HrZone, ReadinessSnapshot, SessionType, UserProfile, WeeklyPlan,
  WorkoutRecord,
};
use crate::notes::generate_notes;
use crate::readiness::{classify, ReadinessAssessment, ReadinessTier};
use crate::validation::{validate_profile, validate_readiness, validate_workouts, ValidationError};
use crate::workload::{RiskBand, WorkloadSummary};

const DAYS_IN_PLAN: i64 = 7;
/// Long run length under high risk, as a percentage of the template
const HIGH_RISK_LONG_RUN_PCT: u32 = 75;
const STRENGTH_FOCUS: &str = "lower body & core";

/// ---------------------------------------------------------------------------
/// Plan Options
/// ---------------------------------------------------------------------------

/// Caller-controlled inputs that pin the plan to a calendar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanOptions {
  /// First day of the planned week; days are labelled `Monday`..`Sunday` when absent
  pub week_start: Option<NaiveDate>,
  /// Instant the workload windows are measured back from
  pub as_of: Option<DateTime<Utc>>,
}

impl PlanOptions {
  pub fn starting(week_start: NaiveDate) -> Self {
    Self {
      week_start: Some(week_start),
      as_of: None,
    }
  }

  /// Explicit `as_of`, else midnight UTC of the week start, else none
  /// (the workload calculator then anchors on the latest workout).
  pub fn reference_instant(&self) -> Option<DateTime<Utc>> {
    self.as_of.or_else(|| {
      self
        .week_start
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
    })
  }
}

/// ---------------------------------------------------------------------------
/// Entry Points
/// ---------------------------------------------------------------------------

/// Generate a seven day plan with the default thresholds
pub fn generate_weekly_plan(
  user: &UserProfile,
  workouts: &[WorkoutRecord],
  readiness: &ReadinessSnapshot,
) -> Result<WeeklyPlan, ValidationError> {
  generate_weekly_plan_with(
    user,
    workouts,
    readiness,
    &PlanOptions::default(),
    &PlannerConfig::default(),
  )
}

pub fn generate_weekly_plan_with(
  user: &UserProfile,
  workouts: &[WorkoutRecord],
  readiness: &ReadinessSnapshot,
  options: &PlanOptions,
  config: &PlannerConfig,
) -> Result<WeeklyPlan, ValidationError> {
  validate_profile(user)?;
  validate_workouts(workouts)?;
  validate_readiness(readiness)?;

  let workload = WorkloadSummary::compute(workouts, options.reference_instant(), &config.workload);
  let assessment = classify(readiness, user.baseline_rhr, &config.readiness);
  let plan = synthesize_week(user, &workload, &assessment, options.week_start);
  let notes = generate_notes(&workload, &assessment, readiness, config);

  Ok(WeeklyPlan {
    acwr: workload.acwr,
    risk_band: workload.risk_band,
    acute_load: workload.acute_load,
    chronic_load: workload.chronic_load,
    readiness: readiness.readiness_score,
    readiness_tier: assessment.tier,
    sleep_hours: readiness.sleep_hours,
    plan,
    notes,
  })
}

/// ---------------------------------------------------------------------------
/// Synthesis
/// ---------------------------------------------------------------------------

/// Build the template week and apply the risk and readiness adjustments
pub fn synthesize_week(
  user: &UserProfile,
  workload: &WorkloadSummary,
  readiness: &ReadinessAssessment,
  week_start: Option<NaiveDate>,
) -> Vec<DayPlan> {
  let mut days: Vec<DayPlan> = (0..DAYS_IN_PLAN)
    .map(|offset| template_day(user, week_start, offset))
    .collect();

  if workload.risk_band == RiskBand::HighRisk {
    downgrade_for_high_risk(user, &mut days, workload.acwr);
  }
  if readiness.tier == ReadinessTier::Low {
    convert_for_low_readiness(user, &mut days);
  }

  days
}

fn template_day(user: &UserProfile, week_start: Option<NaiveDate>, offset: i64) -> DayPlan {
  let (day, weekday) = match week_start {
    Some(start) => {
      let date = start + Duration::days(offset);
      (date.format("%Y-%m-%d").to_string(), date.weekday())
    }
    None => {
      let weekday = (0..offset).fold(Weekday::Mon, |d, _| d.succ());
      (day_name(weekday).to_string(), weekday)
    }
  };

  let session = template_session(weekday);
  DayPlan {
    day,
    weekday: day_name(weekday).to_string(),
    session,
    details: session_details(user, session),
  }
}

/// Baseline week: one long run, two quality runs, one strength day,
/// one active recovery day, one rest day and one easy run.
pub fn template_session(weekday: Weekday) -> SessionType {
  match weekday {
    Weekday::Mon => SessionType::Rest,
    Weekday::Tue => SessionType::IntervalRun,
    Weekday::Wed => SessionType::EasyRun,
    Weekday::Thu => SessionType::TempoRun,
    Weekday::Fri => SessionType::Strength,
    Weekday::Sat => SessionType::LongRun,
    Weekday::Sun => SessionType::ActiveRecovery,
  }
}

fn day_name(weekday: Weekday) -> &'static str {
  match weekday {
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
    Weekday::Sun => "Sunday",
  }
}

/// Default render parameters for a session type
fn session_details(user: &UserProfile, session: SessionType) -> DayDetails {
  let (target_zones, split, focus) = match session {
    SessionType::LongRun => (vec![HrZone::Z2], vec![(HrZone::Z2, 90)], None),
    SessionType::EasyRun => (vec![HrZone::Z2], vec![(HrZone::Z2, 40)], None),
    SessionType::TempoRun => (
      vec![HrZone::Z3],
      vec![(HrZone::Z1, 10), (HrZone::Z3, 30), (HrZone::Z2, 10)],
      None,
    ),
    SessionType::IntervalRun => (
      vec![HrZone::Z4, HrZone::Z5],
      vec![(HrZone::Z1, 15), (HrZone::Z4, 20), (HrZone::Z5, 10)],
      None,
    ),
    SessionType::Strength => (Vec::new(), Vec::new(), Some(STRENGTH_FOCUS)),
    SessionType::ActiveRecovery => (vec![HrZone::Z1], vec![(HrZone::Z1, 30)], None),
    SessionType::Rest => (Vec::new(), Vec::new(), None),
  };

  let zone_minutes: BTreeMap<String, u32> = split
    .into_iter()
    .map(|(zone, minutes): (HrZone, u32)| (zone.as_str().to_string(), minutes))
    .collect();
  let duration_min = match session {
    SessionType::Strength => 45,
    _ => zone_minutes.values().sum(),
  };

  DayDetails {
    target_hr: target_zones
      .first()
      .and_then(|zone| user.zone_range(*zone))
      .map(str::to_string),
    target_zones,
    duration_min,
    zone_minutes,
    focus: focus.map(str::to_string),
    adjusted_from: None,
    reason: None,
  }
}

fn replace_session(user: &UserProfile, day: &mut DayPlan, session: SessionType, reason: String) {
  let original = day.session;
  day.session = session;
  day.details = DayDetails {
    adjusted_from: Some(original),
    reason: Some(reason),
    ..session_details(user, session)
  };
}

/// Rule 1: no quality work and no long run growth while ACWR is high
fn downgrade_for_high_risk(user: &UserProfile, days: &mut [DayPlan], acwr: f64) {
  for day in days.iter_mut() {
    if day.session.is_quality() {
      debug!(day = %day.day, from = day.session.as_str(), "downgrading quality session");
      replace_session(
        user,
        day,
        SessionType::EasyRun,
        format!("ACWR {:.2}: quality work replaced with easy running", acwr),
      );
    } else if day.session == SessionType::LongRun {
      let capped = (day.details.duration_min * HIGH_RISK_LONG_RUN_PCT / 100) / 5 * 5;
      day.details.duration_min = capped;
      day.details.zone_minutes = [(HrZone::Z2.as_str().to_string(), capped)].into_iter().collect();
      day.details.reason = Some(format!("ACWR {:.2}: long run shortened to {} min", acwr, capped));
    }
  }
}

/// Rule 2: swap today, or the next hard session, for active recovery
fn convert_for_low_readiness(user: &UserProfile, days: &mut [DayPlan]) {
  let target = if days.first().is_some_and(|d| !d.session.is_recovery()) {
    Some(0)
  } else {
    days
      .iter()
      .position(|d| d.session.is_hard())
      .or_else(|| days.iter().position(|d| !d.session.is_recovery()))
  };

  if let Some(index) = target {
    let day = &mut days[index];
    debug!(day = %day.day, from = day.session.as_str(), "converting session for low readiness");
    replace_session(
      user,
      day,
      SessionType::ActiveRecovery,
      "Low readiness: recovery before the next hard effort".to_string(),
    );
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
