use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Fire every day at the given local hour and minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Daily {
    pub hour: u8,
    pub minute: u8,
}

impl Daily {
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(SchedulerError::InvalidSchedule(format!(
                "{hour:02}:{minute:02} is not a time of day"
            )));
        }
        Ok(Self { hour, minute })
    }
}

impl std::fmt::Display for Daily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Outcome of the most recent run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for its first run.
    #[default]
    Pending,
    /// Currently being executed.
    Running,
    /// Last execution finished without error.
    Succeeded,
    /// Last execution returned an error.
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Live view of a scheduled job, published by the engine after every change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobState {
    pub status: JobStatus,
    /// Start of the most recent execution, if any.
    pub last_run: Option<DateTime<Local>>,
    /// Next planned execution, if the engine is running.
    pub next_run: Option<DateTime<Local>>,
    /// Total number of executions, successful or not.
    pub run_count: u32,
    /// Error text of the last failed run; cleared on success.
    pub last_error: Option<String>,
}
