//! Single-slot cache for today's readiness reading
//!
//! The slot holds an `Arc` that is replaced whole, so readers always see a
//! complete reading. Refreshes go through one async mutex: a background
//! refresh and an on-demand fetch never overlap, and an on-demand caller that
//! waited on the lock re-checks the slot before fetching again.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::oura::{DailyReadiness, OuraError, ReadinessSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedReadiness {
  pub reading: DailyReadiness,
  pub fetched_at: DateTime<Utc>,
}

/// Where a reading came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOrigin {
  Cache,
  Live,
}

#[derive(Default)]
pub struct ReadinessCache {
  slot: RwLock<Option<Arc<CachedReadiness>>>,
  writer: Mutex<()>,
}

impl ReadinessCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Whatever is in the slot, regardless of date
  pub fn current(&self) -> Option<Arc<CachedReadiness>> {
    self
      .slot
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// The cached reading if it belongs to `date`
  pub fn for_date(&self, date: NaiveDate) -> Option<Arc<CachedReadiness>> {
    self.current().filter(|entry| entry.reading.date == date)
  }

  /// Fetch `date` and replace the slot. A failed fetch leaves the slot untouched.
  pub async fn refresh<S: ReadinessSource + ?Sized>(
    &self,
    source: &S,
    date: NaiveDate,
    now: DateTime<Utc>,
  ) -> Result<Arc<CachedReadiness>, OuraError> {
    let _writer = self.writer.lock().await;
    self.fetch_and_store(source, date, now).await
  }

  /// Serve `date` from the slot, fetching it only when the slot is stale
  pub async fn get_or_refresh<S: ReadinessSource + ?Sized>(
    &self,
    source: &S,
    date: NaiveDate,
    now: DateTime<Utc>,
  ) -> Result<(Arc<CachedReadiness>, ReadingOrigin), OuraError> {
    if let Some(hit) = self.for_date(date) {
      return Ok((hit, ReadingOrigin::Cache));
    }

    let _writer = self.writer.lock().await;
    // Another writer may have filled the slot while we waited
    if let Some(hit) = self.for_date(date) {
      return Ok((hit, ReadingOrigin::Cache));
    }

    let entry = self.fetch_and_store(source, date, now).await?;
    Ok((entry, ReadingOrigin::Live))
  }

  async fn fetch_and_store<S: ReadinessSource + ?Sized>(
    &self,
    source: &S,
    date: NaiveDate,
    now: DateTime<Utc>,
  ) -> Result<Arc<CachedReadiness>, OuraError> {
    let reading = source.fetch_readiness(date).await?;
    let entry = Arc::new(CachedReadiness {
      reading,
      fetched_at: now,
    });

    *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(entry.clone());
    debug!(date = %date, fetched_at = %now, "replaced cached readiness");
    Ok(entry)
  }
}

/// Refresh today's reading every `every` until the task is aborted
pub fn spawn_periodic_refresh<S>(
  cache: Arc<ReadinessCache>,
  source: Arc<S>,
  every: std::time::Duration,
) -> JoinHandle<()>
where
  S: ReadinessSource + ?Sized + 'static,
{
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    loop {
      ticker.tick().await;
      let now = Utc::now();
      match cache.refresh(source.as_ref(), now.date_naive(), now).await {
        Ok(entry) => info!(date = %entry.reading.date, "background readiness refresh complete"),
        Err(e) => warn!(error = %e, "background readiness refresh failed, keeping previous reading"),
      }
    }
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
