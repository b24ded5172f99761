//! Weekly schedule parser.
//!
//! The export is a flat table: a row whose label cell is a weekday name opens
//! that day's block, and the label cells of the rows that follow are the
//! day's subjects until the next weekday row. Everything else is noise.

use tracing::debug;

use crate::types::{Cell, Weekday, WeeklySchedule};

/// Zero-based column holding weekday names and subject names.
pub const LABEL_COLUMN: usize = 1;

/// Column header of the subject column; repeated inside every day block.
pub const HEADER_TOKEN: &str = "Предмет";

/// Scanner state: either no weekday row has been seen yet, or we are inside a day block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Idle,
    InDay(Weekday),
}

/// What a single row means to the scanner.
#[derive(Debug, PartialEq, Eq)]
enum RowKind<'a> {
    DayMarker(Weekday),
    Label(&'a str),
    Ignored,
}

fn classify(row: &[Cell]) -> RowKind<'_> {
    let Some(label) = row.get(LABEL_COLUMN).and_then(Cell::as_text) else {
        return RowKind::Ignored;
    };
    if let Some(day) = Weekday::from_label(label) {
        return RowKind::DayMarker(day);
    }
    if label == HEADER_TOKEN {
        return RowKind::Ignored;
    }
    RowKind::Label(label)
}

/// Turn raw rows into a [`WeeklySchedule`].
///
/// Never fails: blank, malformed and leading rows are skipped. A weekday that
/// appears twice keeps only its last block.
pub fn parse<R: AsRef<[Cell]>>(rows: &[R]) -> WeeklySchedule {
    let mut schedule = WeeklySchedule::new();
    let mut cursor = Cursor::Idle;

    for row in rows {
        match (classify(row.as_ref()), cursor) {
            (RowKind::DayMarker(day), _) => {
                if schedule.get(day).is_some() {
                    debug!(%day, "weekday block repeated; previous block replaced");
                }
                schedule.start_day(day);
                cursor = Cursor::InDay(day);
            }
            (RowKind::Label(subject), Cursor::InDay(day)) => {
                schedule.push_subject(day, subject);
            }
            (RowKind::Label(_), Cursor::Idle) | (RowKind::Ignored, _) => {}
        }
    }

    schedule
}
