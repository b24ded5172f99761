use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone};

use crate::types::Daily;

/// Compute the next execution time for `schedule` strictly *after* `from`,
/// in `from`'s timezone.
///
/// When HH:MM falls in a DST gap the run moves one hour later; when it is
/// ambiguous the earlier instant is used. Returns `None` only at the end of
/// chrono's date range.
pub fn compute_next_run<Tz: TimeZone>(schedule: &Daily, from: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tz = from.timezone();
    let mut day = from.date_naive();

    // Today's window, or tomorrow's once today's has passed.
    for _ in 0..2 {
        if let Some(candidate) = at_local_time(&tz, day, schedule) {
            if candidate > *from {
                return Some(candidate);
            }
        }
        day = day.succ_opt()?;
    }
    None
}

fn at_local_time<Tz: TimeZone>(tz: &Tz, day: NaiveDate, schedule: &Daily) -> Option<DateTime<Tz>> {
    let naive = day.and_hms_opt(schedule.hour as u32, schedule.minute as u32, 0)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        // Clock jumped forward over HH:MM.
        LocalResult::None => tz.from_local_datetime(&(naive + Duration::hours(1))).earliest(),
    }
}
