use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{info, warn};

use crate::cache::ReadinessCache;
use crate::config::PlannerConfig;
use crate::models::{ReadinessDefaults, ReadinessSnapshot, UserProfile, WeeklyPlan, WorkoutRecord};
use crate::oura::{OuraClient, ReadinessSource};
use crate::planner::{generate_weekly_plan_with, PlanOptions};

use super::render_json;

/// ---------------------------------------------------------------------------
/// Request
/// ---------------------------------------------------------------------------

/// Everything the engine needs, as read from a JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
  pub user: UserProfile,
  #[serde(default)]
  pub workouts: Vec<WorkoutRecord>,
  /// Explicit readiness wins over live and default readings
  #[serde(default)]
  pub readiness: Option<ReadinessSnapshot>,
}

pub fn parse_request(raw: &str) -> Result<PlanRequest, String> {
  serde_json::from_str(raw).map_err(|e| format!("Invalid plan request: {}", e))
}

/// Read a request from a file path, or stdin when `input` is `-`
pub fn load_request(input: &str) -> Result<PlanRequest, String> {
  let raw = if input == "-" {
    let mut buf = String::new();
    std::io::stdin()
      .read_to_string(&mut buf)
      .map_err(|e| format!("Failed to read stdin: {}", e))?;
    buf
  } else {
    std::fs::read_to_string(input).map_err(|e| format!("Failed to read {}: {}", input, e))?
  };
  parse_request(&raw)
}

/// ---------------------------------------------------------------------------
/// Readiness Resolution
/// ---------------------------------------------------------------------------

/// A live readiness source together with the cache that fronts it
pub struct LiveReadiness<'a> {
  pub cache: &'a ReadinessCache,
  pub source: &'a dyn ReadinessSource,
}

/// Request readiness first, then today's live reading, then the defaults.
/// A failed live fetch degrades to the defaults.
pub async fn resolve_readiness(
  provided: Option<ReadinessSnapshot>,
  live: Option<LiveReadiness<'_>>,
  defaults: &ReadinessDefaults,
  now: DateTime<Utc>,
) -> ReadinessSnapshot {
  if let Some(snapshot) = provided {
    return snapshot;
  }

  let Some(live) = live else {
    return defaults.snapshot();
  };

  match live.cache.get_or_refresh(live.source, now.date_naive(), now).await {
    Ok((entry, origin)) => {
      info!(origin = ?origin, date = %entry.reading.date, "using live readiness");
      entry.reading.to_snapshot(defaults)
    }
    Err(e) => {
      warn!(error = %e, "live readiness unavailable, using defaults");
      defaults.snapshot()
    }
  }
}

/// ---------------------------------------------------------------------------
/// Plan Command
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
  /// Request JSON file, or `-` for stdin
  #[arg(short, long)]
  pub input: String,

  /// First day of the planned week (YYYY-MM-DD)
  #[arg(long)]
  pub week_start: Option<NaiveDate>,

  /// Fetch today's readiness from Oura when the request has none
  #[arg(long)]
  pub live_readiness: bool,

  /// Single-line JSON output
  #[arg(long)]
  pub compact: bool,
}

impl PlanArgs {
  /// Windows are always measured back from `now`; the week start only
  /// labels the days
  pub fn options(&self, now: DateTime<Utc>) -> PlanOptions {
    PlanOptions {
      week_start: self.week_start,
      as_of: Some(now),
    }
  }
}

pub fn build_plan(
  request: &PlanRequest,
  readiness: &ReadinessSnapshot,
  options: &PlanOptions,
  config: &PlannerConfig,
) -> Result<WeeklyPlan, String> {
  generate_weekly_plan_with(&request.user, &request.workouts, readiness, options, config)
    .map_err(|e| e.to_string())
}

pub async fn run_plan(args: &PlanArgs) -> Result<String, String> {
  let config = PlannerConfig::from_env().map_err(|e| e.to_string())?;
  let request = load_request(&args.input)?;
  let now = Utc::now();

  let cache = ReadinessCache::new();
  let client = if args.live_readiness && request.readiness.is_none() {
    Some(OuraClient::from_env().map_err(|e| e.to_string())?)
  } else {
    None
  };
  let live = client.as_ref().map(|client| LiveReadiness {
    cache: &cache,
    source: client,
  });

  let readiness = resolve_readiness(request.readiness.clone(), live, &config.defaults, now).await;
  let plan = build_plan(&request, &readiness, &args.options(now), &config)?;

  info!(
    user = %request.user.id,
    acwr = plan.acwr,
    readiness_tier = plan.readiness_tier.as_str(),
    "generated weekly plan"
  );
  render_json(&plan, args.compact)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
