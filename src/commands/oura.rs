use chrono::{NaiveDate, Utc};
use clap::Subcommand;

use crate::oura::{OuraClient, RangeEntry};

use super::render_json;

const DEFAULT_RANGE_DAYS: u32 = 7;

#[derive(Debug, Clone, Subcommand)]
pub enum OuraCommand {
  /// Readiness, sleep and resting HR for one day
  Daily {
    /// Day to fetch (YYYY-MM-DD), today when omitted
    #[arg(long)]
    date: Option<NaiveDate>,
  },
  /// The last N days including today, oldest first
  Range {
    #[arg(long, default_value_t = DEFAULT_RANGE_DAYS)]
    days: u32,
  },
}

/// ---------------------------------------------------------------------------
/// Handlers
/// ---------------------------------------------------------------------------

pub async fn run_oura(command: &OuraCommand) -> Result<String, String> {
  let client = OuraClient::from_env().map_err(|e| e.to_string())?;
  let today = Utc::now().date_naive();

  match command {
    OuraCommand::Daily { date } => oura_daily(&client, date.unwrap_or(today)).await,
    OuraCommand::Range { days } => oura_range(&client, *days, today).await,
  }
}

pub async fn oura_daily(client: &OuraClient, date: NaiveDate) -> Result<String, String> {
  let reading = client.fetch_daily(date).await.map_err(|e| e.to_string())?;
  render_json(&reading, false)
}

/// Per-day failures are reported inline rather than failing the range
pub async fn oura_range(client: &OuraClient, days: u32, today: NaiveDate) -> Result<String, String> {
  let entries: Vec<RangeEntry> = client.fetch_range(days, today).await;
  render_json(&entries, false)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::oura::OuraConfig;

  fn client_for(server: &mockito::ServerGuard) -> OuraClient {
    OuraClient::new(OuraConfig {
      access_token: "test-token".to_string(),
      api_base: server.url(),
    })
    .unwrap()
  }

  #[tokio::test]
  async fn test_daily_renders_reading() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/daily_readiness")
      .match_query(mockito::Matcher::Any)
      .with_status(200)
      .with_body(r#"{"data": [{"day": "2024-06-03", "score": 81}]}"#)
      .create_async()
      .await;
    server
      .mock("GET", "/daily_sleep")
      .match_query(mockito::Matcher::Any)
      .with_status(200)
      .with_body(
        r#"{"data": [{"day": "2024-06-03", "total_sleep_duration": 27000, "lowest_heart_rate": 52}]}"#,
      )
      .create_async()
      .await;

    let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let output = oura_daily(&client_for(&server), date).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["date"], "2024-06-03");
    assert_eq!(value["readiness_score"], 81);
    assert_eq!(value["sleep_hours"], 7.5);
    assert_eq!(value["rhr"], 52);
  }

  #[tokio::test]
  async fn test_daily_surfaces_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/daily_readiness")
      .match_query(mockito::Matcher::Any)
      .with_status(401)
      .with_body("unauthorized")
      .create_async()
      .await;

    let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let err = oura_daily(&client_for(&server), date).await.unwrap_err();
    assert!(err.contains("401"));
  }

  #[tokio::test]
  async fn test_range_lists_failures_inline() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", mockito::Matcher::Any)
      .match_query(mockito::Matcher::Any)
      .with_status(500)
      .create_async()
      .await;

    let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    let output = oura_range(&client_for(&server), 2, today).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["date"], "2024-06-02");
    assert!(entries[1]["error"].as_str().unwrap().contains("500"));
  }
}
