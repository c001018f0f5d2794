//! Re-plan on an interval
//!
//! The request file is re-read on every tick so edits show up in the next
//! plan. When an Oura token is configured a background task keeps today's
//! readiness warm in the cache.

use chrono::Utc;
use clap::Args;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::cache::{spawn_periodic_refresh, ReadinessCache};
use crate::config::PlannerConfig;
use crate::oura::{OuraClient, ReadinessSource};
use crate::planner::PlanOptions;

use super::plan::{build_plan, load_request, resolve_readiness, LiveReadiness};
use super::render_json;

#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
  /// Request JSON file
  #[arg(short, long)]
  pub input: String,

  #[arg(long, default_value_t = 900)]
  pub interval_secs: u64,

  /// Stop after this many ticks; runs until interrupted when omitted
  #[arg(long)]
  pub ticks: Option<u32>,
}

pub async fn run_watch(args: &WatchArgs) -> Result<String, String> {
  let config = PlannerConfig::from_env().map_err(|e| e.to_string())?;
  let source: Option<Arc<dyn ReadinessSource>> = match OuraClient::from_env() {
    Ok(client) => Some(Arc::new(client)),
    Err(e) => {
      warn!(error = %e, "Oura not configured, planning with request or default readiness");
      None
    }
  };

  let every = Duration::from_secs(args.interval_secs.max(1));
  let mut stdout = std::io::stdout();
  let written = watch_with(&args.input, every, args.ticks, source, &config, &mut stdout).await?;
  Ok(format!("Emitted {} plans", written))
}

/// Emit one compact plan per line to `out` every `every`; returns the
/// number of plans written
pub async fn watch_with<W: Write>(
  input: &str,
  every: Duration,
  ticks: Option<u32>,
  source: Option<Arc<dyn ReadinessSource>>,
  config: &PlannerConfig,
  out: &mut W,
) -> Result<u32, String> {
  let cache = Arc::new(ReadinessCache::new());
  let refresher = source
    .clone()
    .map(|source| spawn_periodic_refresh(cache.clone(), source, every));

  let mut ticker = tokio::time::interval(every);
  let mut tick = 0;
  let mut written = 0;
  let result = loop {
    if ticks.is_some_and(|limit| tick >= limit) {
      break Ok(written);
    }
    ticker.tick().await;
    tick += 1;

    // A broken request file is reported and retried on the next tick
    let request = match load_request(input) {
      Ok(request) => request,
      Err(e) => {
        warn!(tick, error = %e, "skipping tick");
        continue;
      }
    };

    let now = Utc::now();
    let live = source.as_deref().map(|source| LiveReadiness {
      cache: cache.as_ref(),
      source,
    });
    let readiness = resolve_readiness(request.readiness.clone(), live, &config.defaults, now).await;

    let options = PlanOptions {
      week_start: None,
      as_of: Some(now),
    };
    let line = match build_plan(&request, &readiness, &options, config) {
      Ok(plan) => render_json(&plan, true)?,
      Err(e) => {
        warn!(tick, error = %e, "plan rejected");
        continue;
      }
    };

    if let Err(e) = writeln!(out, "{}", line) {
      break Err(format!("Failed to write plan: {}", e));
    }
    written += 1;
    info!(tick, "emitted plan");
  };

  if let Some(handle) = refresher {
    handle.abort();
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use chrono::NaiveDate;
  use std::path::PathBuf;

  use crate::oura::{DailyReadiness, OuraError};

  struct LowReadiness;

  #[async_trait]
  impl ReadinessSource for LowReadiness {
    async fn fetch_readiness(&self, date: NaiveDate) -> Result<DailyReadiness, OuraError> {
      Ok(DailyReadiness {
        date,
        readiness_score: Some(45),
        sleep_hours: Some(5.0),
        rhr: Some(66),
      })
    }
  }

  fn write_request(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
    std::fs::write(&path, body).unwrap();
    path
  }

  const REQUEST: &str = r#"{
    "user": {"id": "athlete-1", "baseline_rhr": 60},
    "workouts": []
  }"#;

  #[tokio::test]
  async fn test_emits_one_line_per_tick() {
    let path = write_request("watch-ticks", REQUEST);
    let mut out = Vec::new();

    let written = watch_with(
      path.to_str().unwrap(),
      Duration::from_millis(5),
      Some(3),
      None,
      &PlannerConfig::default(),
      &mut out,
    )
    .await
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(written, 3);
    assert_eq!(text.lines().count(), 3);
    for line in text.lines() {
      let value: serde_json::Value = serde_json::from_str(line).unwrap();
      assert_eq!(value["readiness"], 75);
    }
    std::fs::remove_file(path).ok();
  }

  #[tokio::test]
  async fn test_live_readiness_reaches_plan() {
    let path = write_request("watch-live", REQUEST);
    let mut out = Vec::new();

    watch_with(
      path.to_str().unwrap(),
      Duration::from_millis(5),
      Some(1),
      Some(Arc::new(LowReadiness)),
      &PlannerConfig::default(),
      &mut out,
    )
    .await
    .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["readiness"], 45);
    assert_eq!(value["readiness_tier"], "low");
    std::fs::remove_file(path).ok();
  }

  #[tokio::test]
  async fn test_unreadable_request_skips_tick() {
    let mut out = Vec::new();
    let written = watch_with(
      "/nonexistent/watch-request.json",
      Duration::from_millis(5),
      Some(2),
      None,
      &PlannerConfig::default(),
      &mut out,
    )
    .await
    .unwrap();

    assert_eq!(written, 0);
    assert!(out.is_empty());
  }
}
