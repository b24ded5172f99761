use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::{
    error::Result,
    schedule::compute_next_run,
    types::{Daily, JobState, JobStatus},
};

/// Work executed by the engine at every scheduled slot.
#[async_trait]
pub trait Job: Send + Sync {
    /// Label used in logs.
    fn name(&self) -> &str;

    /// Execute once. An error is logged and recorded; the engine keeps running.
    async fn run(&self) -> Result<()>;
}

/// Fires one [`Job`] every day at a fixed local time.
pub struct DailyEngine {
    schedule: Daily,
    job: Arc<dyn Job>,
    state_tx: watch::Sender<JobState>,
}

impl DailyEngine {
    pub fn new(schedule: Daily, job: Arc<dyn Job>) -> Self {
        let (state_tx, _) = watch::channel(JobState::default());
        Self {
            schedule,
            job,
            state_tx,
        }
    }

    /// Receive a fresh [`JobState`] after every status change.
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state_tx.subscribe()
    }

    /// Main event loop. Fires at every slot until `shutdown` broadcasts `true`
    /// or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(job = %self.job.name(), at = %self.schedule, "daily engine started");
        let mut last_slot: Option<DateTime<Local>> = None;

        loop {
            // Never reuse a slot that has already fired, even if the timer woke early.
            let from = match last_slot {
                Some(slot) => slot.max(Local::now()),
                None => Local::now(),
            };
            let Some(next) = compute_next_run(&self.schedule, &from) else {
                error!(job = %self.job.name(), "no next run could be computed; engine stopping");
                break;
            };
            self.state_tx.send_modify(|s| s.next_run = Some(next));
            info!(job = %self.job.name(), next_run = %next, "next run scheduled");

            let wait = (next - Local::now()).to_std().unwrap_or_default();
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    last_slot = Some(next);
                    self.fire().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(job = %self.job.name(), "daily engine shutting down");
                        break;
                    }
                }
            }
        }

        self.state_tx.send_modify(|s| s.next_run = None);
    }

    /// Run the job once and record the outcome.
    pub async fn fire(&self) {
        let started = Local::now();
        self.state_tx.send_modify(|s| {
            s.status = JobStatus::Running;
            s.last_run = Some(started);
            s.run_count += 1;
        });
        info!(job = %self.job.name(), "executing job");

        match self.job.run().await {
            Ok(()) => {
                info!(job = %self.job.name(), "job succeeded");
                self.state_tx.send_modify(|s| {
                    s.status = JobStatus::Succeeded;
                    s.last_error = None;
                });
            }
            Err(e) => {
                warn!(job = %self.job.name(), error = %e, "job failed; will retry at next slot");
                self.state_tx.send_modify(|s| {
                    s.status = JobStatus::Failed;
                    s.last_error = Some(e.to_string());
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingJob {
        runs: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Job for CountingJob {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SchedulerError::JobFailed("portal unreachable".into()))
            } else {
                Ok(())
            }
        }
    }

    fn engine(fail: bool) -> (DailyEngine, Arc<CountingJob>) {
        let job = Arc::new(CountingJob {
            runs: AtomicUsize::new(0),
            fail,
        });
        (DailyEngine::new(Daily::new(6, 0).unwrap(), job.clone()), job)
    }

    #[tokio::test]
    async fn successful_fire_is_recorded() {
        let (engine, job) = engine(false);
        let state = engine.subscribe();

        engine.fire().await;

        assert_eq!(job.runs.load(Ordering::SeqCst), 1);
        let state = state.borrow();
        assert_eq!(state.status, JobStatus::Succeeded);
        assert_eq!(state.run_count, 1);
        assert!(state.last_run.is_some());
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn failed_fire_is_recorded_and_survivable() {
        let (engine, job) = engine(true);
        let state = engine.subscribe();

        engine.fire().await;
        engine.fire().await;

        assert_eq!(job.runs.load(Ordering::SeqCst), 2);
        let state = state.borrow();
        assert_eq!(state.status, JobStatus::Failed);
        assert_eq!(state.run_count, 2);
        assert!(state
            .last_error
            .as_deref()
            .unwrap()
            .contains("portal unreachable"));
    }

    #[tokio::test]
    async fn run_publishes_next_slot_and_stops_on_shutdown() {
        let (engine, job) = engine(false);
        let mut state = engine.subscribe();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(engine.run(shutdown_rx));

        tokio::time::timeout(Duration::from_secs(5), state.wait_for(|s| s.next_run.is_some()))
            .await
            .expect("engine never scheduled a run")
            .unwrap();
        let next = state.borrow().next_run.unwrap();
        assert!(next > Local::now());

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("engine did not stop")
            .unwrap();

        assert_eq!(job.runs.load(Ordering::SeqCst), 0);
        assert!(state.borrow().next_run.is_none());
    }
}
