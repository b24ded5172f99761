use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use dars_scheduler::{Job, SchedulerError};
use dars_timetable::Refresher;
use tracing::info;

/// Daily timer job: unconditional refresh that overwrites the cache on success.
pub struct DailyRefresh {
    refresher: Arc<Refresher>,
}

impl DailyRefresh {
    pub fn new(refresher: Arc<Refresher>) -> Self {
        Self { refresher }
    }
}

#[async_trait]
impl Job for DailyRefresh {
    fn name(&self) -> &str {
        "schedule-refresh"
    }

    async fn run(&self) -> dars_scheduler::Result<()> {
        let result = self
            .refresher
            .refresh_now(Local::now())
            .await
            .map_err(|e| SchedulerError::JobFailed(e.to_string()))?;
        info!(
            date = %result.today.date,
            today = result.today.subjects.len(),
            tomorrow = result.tomorrow.subjects.len(),
            "daily schedule refreshed"
        );
        Ok(())
    }
}
