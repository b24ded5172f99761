//! `dars-timetable` — weekly class schedule extraction and daily freshness.
//!
//! # Pipeline
//!
//! ```text
//! ExportFetcher ─▶ workbook::read_first_sheet ─▶ parser::parse ─▶ resolver::resolve ─▶ ScheduleCache
//! ```
//!
//! [`refresh::Refresher`] drives the pipeline, either on a cache miss
//! ([`Refresher::ensure_fresh`]) or unconditionally ([`Refresher::refresh_now`]).
//! The cache holds one [`ScheduleResult`] valid for the local calendar day on
//! which it was produced.
//!
//! | Host day | `today` subjects | `tomorrow` subjects |
//! |----------|------------------|---------------------|
//! | Mon–Fri  | same weekday     | next weekday        |
//! | Saturday | Shanba           | Dushanba (Monday)   |
//! | Sunday   | none             | Dushanba (Monday)   |
//!
//! Dates in the result are always the literal calendar day and the day after.

pub mod cache;
pub mod error;
pub mod parser;
pub mod refresh;
pub mod resolver;
pub mod types;
pub mod workbook;

pub use cache::{CacheEntry, ScheduleCache};
pub use error::{Result, TimetableError};
pub use refresh::{ExportFetcher, Refresher};
pub use types::{Cell, DaySchedule, Row, ScheduleResult, Weekday, WeeklySchedule};
