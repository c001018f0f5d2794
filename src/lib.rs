pub mod cache;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod notes;
pub mod oura;
pub mod planner;
pub mod readiness;
pub mod validation;
pub mod workload;

#[cfg(test)]
mod test_utils;

pub use config::PlannerConfig;
pub use models::{
  DayDetails, DayPlan, HrZone, ReadinessSnapshot, SessionType, UserProfile, WeeklyPlan,
  WorkoutRecord, WorkoutType,
};
pub use planner::{generate_weekly_plan, generate_weekly_plan_with, PlanOptions};
pub use validation::ValidationError;

use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use commands::Cli;

pub fn run() -> ExitCode {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let cli = Cli::parse();
  logging::init_logging(cli.verbose);

  let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
    Ok(runtime) => runtime,
    Err(e) => {
      eprintln!("Failed to start async runtime: {}", e);
      return ExitCode::FAILURE;
    }
  };

  match runtime.block_on(commands::dispatch(&cli.command)) {
    Ok(output) => {
      println!("{}", output);
      ExitCode::SUCCESS
    }
    Err(e) => {
      error!(error = %e, "command failed");
      eprintln!("Error: {}", e);
      ExitCode::FAILURE
    }
  }
}
