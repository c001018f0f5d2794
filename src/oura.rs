//! Oura Ring readiness source
//!
//! Fetches the three signals the planner needs (readiness score, sleep
//! duration, resting HR) for a single day. Authenticates with a personal
//! access token. Missing values stay `None`; filling them in is the
//! caller's job via `DailyReadiness::to_snapshot`.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};
use url::Url;

use crate::models::{ReadinessDefaults, ReadinessSnapshot};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const OURA_API_BASE: &str = "https://api.ouraring.com/v2/usercollection";
const REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct OuraConfig {
  pub access_token: String,
  pub api_base: String,
}

impl OuraConfig {
  pub fn from_env() -> Result<Self, OuraError> {
    Ok(Self {
      access_token: env::var("OURA_PAT")
        .map_err(|_| OuraError::MissingConfig("OURA_PAT".into()))?,
      api_base: parse_api_base(
        &env::var("OURA_API_BASE").unwrap_or_else(|_| OURA_API_BASE.to_string()),
      )?,
    })
  }
}

/// Reject anything that is not an absolute http(s) URL
fn parse_api_base(raw: &str) -> Result<String, OuraError> {
  let parsed = Url::parse(raw)
    .map_err(|e| OuraError::InvalidConfig(format!("OURA_API_BASE {:?}: {}", raw, e)))?;
  match parsed.scheme() {
    "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
    other => Err(OuraError::InvalidConfig(format!(
      "OURA_API_BASE must be http or https, got {}",
      other
    ))),
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum OuraError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

// Convert reqwest::Error to OuraError
impl From<reqwest::Error> for OuraError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_decode() {
      OuraError::Parse(e.to_string())
    } else {
      OuraError::Request(e.to_string())
    }
  }
}

/// ---------------------------------------------------------------------------
/// Oura API Data Structures
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DailyReadinessResponse {
  pub data: Vec<DailyReadinessData>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct DailyReadinessData {
  pub day: String, // ISO date (YYYY-MM-DD)
  pub score: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DailySleepResponse {
  pub data: Vec<DailySleepData>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct DailySleepData {
  pub day: String,                       // ISO date (YYYY-MM-DD)
  pub total_sleep_duration: Option<i64>, // seconds
  pub lowest_heart_rate: Option<i64>,    // beats per minute
  pub average_heart_rate: Option<f64>,   // beats per minute
}

/// ---------------------------------------------------------------------------
/// Daily Readiness
/// ---------------------------------------------------------------------------

/// The signals available for one day; any of them may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReadiness {
  pub date: NaiveDate,
  pub readiness_score: Option<i64>,
  pub sleep_hours: Option<f64>,
  pub rhr: Option<i64>,
}

impl DailyReadiness {
  /// Combine the two API responses for a day
  pub fn from_responses(
    date: NaiveDate,
    readiness: &DailyReadinessResponse,
    sleep: &DailySleepResponse,
  ) -> Self {
    let readiness_score = readiness.data.first().and_then(|r| r.score);
    let (sleep_hours, rhr) = match sleep.data.first() {
      Some(s) => (
        s.total_sleep_duration
          .map(|secs| (secs as f64 / 3600.0 * 100.0).round() / 100.0),
        s.lowest_heart_rate
          .or_else(|| s.average_heart_rate.map(|hr| hr.round() as i64)),
      ),
      None => (None, None),
    };

    Self {
      date,
      readiness_score,
      sleep_hours,
      rhr,
    }
  }

  /// Fill missing signals from the named defaults
  pub fn to_snapshot(&self, defaults: &ReadinessDefaults) -> ReadinessSnapshot {
    if !self.is_complete() {
      warn!(date = %self.date, "readiness reading incomplete, using defaults for missing fields");
    }
    ReadinessSnapshot {
      readiness_score: self.readiness_score.unwrap_or(defaults.readiness_score),
      sleep_hours: self.sleep_hours.unwrap_or(defaults.sleep_hours),
      rhr: self.rhr.unwrap_or(defaults.rhr),
      date: Some(self.date),
    }
  }

  pub fn is_complete(&self) -> bool {
    self.readiness_score.is_some() && self.sleep_hours.is_some() && self.rhr.is_some()
  }
}

/// One day of a range fetch; failures are kept per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeEntry {
  Reading(DailyReadiness),
  Failed { date: NaiveDate, error: String },
}

impl RangeEntry {
  pub fn date(&self) -> NaiveDate {
    match self {
      RangeEntry::Reading(r) => r.date,
      RangeEntry::Failed { date, .. } => *date,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Readiness Source
/// ---------------------------------------------------------------------------

/// Anything that can supply a day's readiness signals
#[async_trait]
pub trait ReadinessSource: Send + Sync {
  async fn fetch_readiness(&self, date: NaiveDate) -> Result<DailyReadiness, OuraError>;
}

/// ---------------------------------------------------------------------------
/// Oura Client
/// ---------------------------------------------------------------------------

pub struct OuraClient {
  client: Client,
  config: OuraConfig,
}

impl OuraClient {
  pub fn new(config: OuraConfig) -> Result<Self, OuraError> {
    let client = Client::builder()
      .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
      .build()?;
    Ok(Self { client, config })
  }

  pub fn from_env() -> Result<Self, OuraError> {
    Self::new(OuraConfig::from_env()?)
  }

  /// Fetch readiness, sleep and resting HR for a single day
  pub async fn fetch_daily(&self, date: NaiveDate) -> Result<DailyReadiness, OuraError> {
    let readiness: DailyReadinessResponse = self.get_collection("daily_readiness", date).await?;
    let sleep: DailySleepResponse = self.get_collection("daily_sleep", date).await?;

    let daily = DailyReadiness::from_responses(date, &readiness, &sleep);
    info!(
      date = %date,
      readiness_score = ?daily.readiness_score,
      sleep_hours = ?daily.sleep_hours,
      rhr = ?daily.rhr,
      "fetched Oura readiness"
    );
    Ok(daily)
  }

  /// Fetch the last `days` days up to and including `today`, oldest first
  pub async fn fetch_range(&self, days: u32, today: NaiveDate) -> Vec<RangeEntry> {
    let mut entries = Vec::with_capacity(days as usize);
    for offset in 0..days {
      let date = today - Duration::days(offset as i64);
      let entry = match self.fetch_daily(date).await {
        Ok(reading) => RangeEntry::Reading(reading),
        Err(e) => {
          warn!(date = %date, error = %e, "failed to fetch Oura readiness");
          RangeEntry::Failed {
            date,
            error: e.to_string(),
          }
        }
      };
      entries.push(entry);
    }
    entries.reverse();
    entries
  }

  async fn get_collection<T: serde::de::DeserializeOwned>(
    &self,
    collection: &str,
    date: NaiveDate,
  ) -> Result<T, OuraError> {
    let url = format!("{}/{}", self.config.api_base.trim_end_matches('/'), collection);
    let day = date.format("%Y-%m-%d").to_string();

    let response = self
      .client
      .get(&url)
      .bearer_auth(&self.config.access_token)
      .query(&[("start_date", day.as_str()), ("end_date", day.as_str())])
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status();
      let error_text = response.text().await.unwrap_or_default();
      return Err(OuraError::Api(format!(
        "{} API error {}: {}",
        collection, status, error_text
      )));
    }

    Ok(response.json().await?)
  }
}

#[async_trait]
impl ReadinessSource for OuraClient {
  async fn fetch_readiness(&self, date: NaiveDate) -> Result<DailyReadiness, OuraError> {
    self.fetch_daily(date).await
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::Matcher;
  use serial_test::serial;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
  }

  fn client_for(server: &mockito::ServerGuard) -> OuraClient {
    OuraClient::new(OuraConfig {
      access_token: "test-token".to_string(),
      api_base: server.url(),
    })
    .unwrap()
  }

  fn date_query(date: &str) -> Matcher {
    Matcher::AllOf(vec![
      Matcher::UrlEncoded("start_date".into(), date.into()),
      Matcher::UrlEncoded("end_date".into(), date.into()),
    ])
  }

  #[tokio::test]
  async fn test_fetch_daily_combines_collections() {
    let mut server = mockito::Server::new_async().await;
    let readiness = server
      .mock("GET", "/daily_readiness")
      .match_query(date_query("2024-06-03"))
      .match_header("authorization", "Bearer test-token")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"data": [{"day": "2024-06-03", "score": 82}]}"#)
      .create_async()
      .await;
    let sleep = server
      .mock("GET", "/daily_sleep")
      .match_query(date_query("2024-06-03"))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"data": [{"day": "2024-06-03", "total_sleep_duration": 26100, "lowest_heart_rate": 52}]}"#,
      )
      .create_async()
      .await;

    let daily = client_for(&server).fetch_daily(day(3)).await.unwrap();

    readiness.assert_async().await;
    sleep.assert_async().await;
    assert_eq!(
      daily,
      DailyReadiness {
        date: day(3),
        readiness_score: Some(82),
        sleep_hours: Some(7.25),
        rhr: Some(52),
      }
    );
  }

  #[tokio::test]
  async fn test_fetch_daily_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/daily_readiness")
      .match_query(Matcher::Any)
      .with_status(401)
      .with_body("unauthorized")
      .create_async()
      .await;

    let err = client_for(&server).fetch_daily(day(3)).await.unwrap_err();
    assert!(matches!(err, OuraError::Api(ref msg) if msg.contains("401")));
  }

  #[tokio::test]
  async fn test_fetch_range_keeps_per_day_failures() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/daily_readiness")
      .match_query(date_query("2024-06-03"))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"data": [{"day": "2024-06-03", "score": 70}]}"#)
      .create_async()
      .await;
    server
      .mock("GET", "/daily_sleep")
      .match_query(date_query("2024-06-03"))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"data": []}"#)
      .create_async()
      .await;
    server
      .mock("GET", "/daily_readiness")
      .match_query(date_query("2024-06-02"))
      .with_status(500)
      .with_body("boom")
      .create_async()
      .await;

    let entries = client_for(&server).fetch_range(2, day(3)).await;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].date(), day(2));
    assert!(matches!(entries[0], RangeEntry::Failed { ref error, .. } if error.contains("500")));
    assert_eq!(entries[1].date(), day(3));
    assert!(matches!(
      entries[1],
      RangeEntry::Reading(DailyReadiness { readiness_score: Some(70), sleep_hours: None, .. })
    ));
  }

  #[test]
  fn test_rhr_falls_back_to_average() {
    let readiness = DailyReadinessResponse { data: vec![] };
    let sleep = DailySleepResponse {
      data: vec![DailySleepData {
        day: "2024-06-03".to_string(),
        total_sleep_duration: None,
        lowest_heart_rate: None,
        average_heart_rate: Some(57.6),
      }],
    };

    let daily = DailyReadiness::from_responses(day(3), &readiness, &sleep);
    assert_eq!(daily.rhr, Some(58));
    assert_eq!(daily.readiness_score, None);
    assert_eq!(daily.sleep_hours, None);
  }

  #[test]
  fn test_to_snapshot_fills_missing_fields() {
    let partial = DailyReadiness {
      date: day(3),
      readiness_score: Some(64),
      sleep_hours: None,
      rhr: None,
    };

    let snapshot = partial.to_snapshot(&ReadinessDefaults::default());
    assert_eq!(snapshot.readiness_score, 64);
    assert_eq!(snapshot.sleep_hours, 7.0);
    assert_eq!(snapshot.rhr, 58);
    assert_eq!(snapshot.date, Some(day(3)));
    assert!(!partial.is_complete());
  }

  #[test]
  fn test_range_entry_serialization() {
    let failed = RangeEntry::Failed {
      date: day(2),
      error: "API error".to_string(),
    };
    let json = serde_json::to_value(&failed).unwrap();
    assert_eq!(json, serde_json::json!({"date": "2024-06-02", "error": "API error"}));
  }

  #[test]
  #[serial]
  fn test_config_requires_token() {
    temp_env::with_vars(
      [("OURA_PAT", None::<&str>), ("OURA_API_BASE", None)],
      || {
        let err = OuraConfig::from_env().unwrap_err();
        assert!(matches!(err, OuraError::MissingConfig(ref var) if var == "OURA_PAT"));
      },
    );
    temp_env::with_vars(
      [("OURA_PAT", Some("pat")), ("OURA_API_BASE", None)],
      || {
        let config = OuraConfig::from_env().unwrap();
        assert_eq!(config.access_token, "pat");
        assert_eq!(config.api_base, OURA_API_BASE);
      },
    );
  }

  #[test]
  #[serial]
  fn test_config_rejects_bad_api_base() {
    temp_env::with_vars(
      [("OURA_PAT", Some("pat")), ("OURA_API_BASE", Some("not a url"))],
      || {
        assert!(matches!(OuraConfig::from_env(), Err(OuraError::InvalidConfig(_))));
      },
    );
    temp_env::with_vars(
      [("OURA_PAT", Some("pat")), ("OURA_API_BASE", Some("ftp://example.com/v2"))],
      || {
        assert!(matches!(OuraConfig::from_env(), Err(OuraError::InvalidConfig(_))));
      },
    );
    temp_env::with_vars(
      [("OURA_PAT", Some("pat")), ("OURA_API_BASE", Some("http://localhost:8080/v2/"))],
      || {
        let config = OuraConfig::from_env().unwrap();
        assert_eq!(config.api_base, "http://localhost:8080/v2");
      },
    );
  }
}
