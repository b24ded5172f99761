//! `dars-scheduler` — Tokio-based daily trigger on the host's local clock.
//!
//! # Overview
//!
//! A [`engine::DailyEngine`] sleeps until the next `HH:MM` local time, runs
//! its [`engine::Job`], records the outcome in a [`types::JobState`] that
//! callers can watch, and goes back to sleep. A failing job is logged and
//! never stops the loop. Nothing is persisted: a restart simply computes the
//! next slot again.

pub mod engine;
pub mod error;
pub mod schedule;
pub mod types;

pub use engine::{DailyEngine, Job};
pub use error::{Result, SchedulerError};
pub use types::{Daily, JobState, JobStatus};
