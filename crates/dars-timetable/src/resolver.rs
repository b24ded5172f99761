//! Resolve "today" and "tomorrow" against a [`WeeklySchedule`].
//!
//! Dates are always the literal calendar day and the one after it. Only the
//! weekday used to look up subjects is adjusted: Sunday has none, and the day
//! after Saturday or Sunday reads Monday's subjects.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

use crate::types::{DaySchedule, ScheduleResult, Weekday, WeeklySchedule};

/// Class days whose subjects fill `today` and `tomorrow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayNames {
    /// `None` on Sunday.
    pub today: Option<Weekday>,
    pub tomorrow: Weekday,
}

/// Lookup names for a host day-of-week number (0 = Sunday … 6 = Saturday).
pub fn day_names(today_num: u32) -> DayNames {
    let today_num = today_num % 7;
    let tomorrow_num = (today_num + 1) % 7;

    let today = Weekday::from_number(today_num);
    // Sunday is never a class day; both Saturday and Sunday roll over to Monday.
    let tomorrow = Weekday::from_number(tomorrow_num).unwrap_or(Weekday::Dushanba);

    DayNames { today, tomorrow }
}

/// Resolve against the calendar date of `now` in its own timezone.
pub fn resolve<Tz: TimeZone>(now: &DateTime<Tz>, schedule: &WeeklySchedule) -> ScheduleResult {
    resolve_date(now.date_naive(), schedule)
}

pub fn resolve_date(today: NaiveDate, schedule: &WeeklySchedule) -> ScheduleResult {
    let names = day_names(today.weekday().num_days_from_sunday());
    let tomorrow = today.succ_opt().unwrap_or(NaiveDate::MAX);

    ScheduleResult {
        today: DaySchedule {
            date: today,
            subjects: names
                .today
                .map(|day| schedule.subjects(day))
                .unwrap_or_default(),
        },
        tomorrow: DaySchedule {
            date: tomorrow,
            subjects: schedule.subjects(names.tomorrow),
        },
    }
}
