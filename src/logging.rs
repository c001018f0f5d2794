//! Logging setup
//!
//! Logs go to stderr so `plan` output on stdout stays machine-readable.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Default filter for a given `-v` count
pub fn level_for(verbose: u8) -> &'static str {
  match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  }
}

/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level
pub fn init_logging(verbose: u8) {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(verbose >= 2)
    .with_line_number(verbose >= 3)
    .try_init();

  debug!(verbose, "logging initialized");
}
