use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{
    cache::ScheduleCache,
    error::{Result, TimetableError},
    parser, resolver,
    types::ScheduleResult,
    workbook,
};

/// Source of the raw schedule export.
///
/// Implementations own their credentials and collapse every login, navigation
/// and download failure into [`TimetableError::Fetch`].
#[async_trait]
pub trait ExportFetcher: Send + Sync {
    /// Download the raw spreadsheet bytes.
    async fn fetch_raw(&self) -> Result<Vec<u8>>;
}

/// Runs fetch → parse → resolve → store, either on a cache miss or unconditionally.
///
/// At most one refresh is in flight: concurrent cache misses wait for the
/// running refresh and then read its result from the cache.
pub struct Refresher {
    fetcher: Arc<dyn ExportFetcher>,
    cache: Arc<ScheduleCache>,
    in_flight: Mutex<()>,
    fetch_timeout: Option<Duration>,
}

impl Refresher {
    pub fn new(fetcher: Arc<dyn ExportFetcher>, cache: Arc<ScheduleCache>) -> Self {
        Self {
            fetcher,
            cache,
            in_flight: Mutex::new(()),
            fetch_timeout: None,
        }
    }

    /// Bound each fetch. `None` waits for the fetcher indefinitely.
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn cache(&self) -> &Arc<ScheduleCache> {
        &self.cache
    }

    /// Cached result for `now`'s day, refreshing on a miss.
    pub async fn ensure_fresh(&self, now: DateTime<Local>) -> Result<ScheduleResult> {
        let today = now.date_naive();
        if let Some(hit) = self.cache.get(today) {
            debug!(%today, "schedule cache hit");
            return Ok(hit);
        }

        let _guard = self.in_flight.lock().await;
        // A refresh that finished while we waited already covers today.
        if let Some(hit) = self.cache.get(today) {
            debug!(%today, "schedule cache filled by concurrent refresh");
            return Ok(hit);
        }

        debug!(%today, "schedule cache miss");
        self.run(now).await
    }

    /// Refresh regardless of what the cache holds.
    pub async fn refresh_now(&self, now: DateTime<Local>) -> Result<ScheduleResult> {
        let _guard = self.in_flight.lock().await;
        self.run(now).await
    }

    async fn run(&self, now: DateTime<Local>) -> Result<ScheduleResult> {
        info!("refreshing schedule");

        let bytes = self.fetch().await.inspect_err(|e| {
            error!(error = %e, "schedule fetch failed; cache left untouched");
        })?;
        let rows = workbook::read_first_sheet(&bytes).inspect_err(|e| {
            error!(error = %e, "downloaded export is unreadable; cache left untouched");
        })?;

        let schedule = parser::parse(&rows);
        let result = resolver::resolve(&now, &schedule);
        self.cache.put(result.clone(), now.date_naive());

        info!(
            rows = rows.len(),
            days = schedule.len(),
            today = result.today.subjects.len(),
            tomorrow = result.tomorrow.subjects.len(),
            "schedule refreshed"
        );
        Ok(result)
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetcher.fetch_raw())
                .await
                .map_err(|_| TimetableError::Timeout {
                    secs: limit.as_secs(),
                })?,
            None => self.fetcher.fetch_raw().await,
        }
    }
}
