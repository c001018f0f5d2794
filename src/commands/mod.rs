//! Handlers behind the command line. Each one returns the text to print, or
//! an error message for stderr.

pub mod oura;
pub mod plan;
pub mod watch;

pub use oura::{run_oura, OuraCommand};
pub use plan::{run_plan, PlanArgs, PlanRequest};
pub use watch::{run_watch, WatchArgs};

use clap::{Parser, Subcommand};
use serde::Serialize;

/// Weekly run and strength planning from workload and readiness
#[derive(Debug, Parser)]
#[command(name = "run-strength-planner", version)]
pub struct Cli {
  /// More output on stderr (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
  /// Generate a seven day plan from a request file
  Plan(PlanArgs),
  /// Inspect readings from the Oura API
  Oura {
    #[command(subcommand)]
    command: OuraCommand,
  },
  /// Re-plan on an interval, one JSON line per tick
  Watch(WatchArgs),
}

pub async fn dispatch(command: &Command) -> Result<String, String> {
  match command {
    Command::Plan(args) => run_plan(args).await,
    Command::Oura { command } => run_oura(command).await,
    Command::Watch(args) => run_watch(args).await,
  }
}

pub(crate) fn render_json<T: Serialize>(value: &T, compact: bool) -> Result<String, String> {
  let rendered = if compact {
    serde_json::to_string(value)
  } else {
    serde_json::to_string_pretty(value)
  };
  rendered.map_err(|e| format!("Failed to serialize output: {}", e))
}
