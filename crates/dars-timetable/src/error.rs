use thiserror::Error;

/// Errors surfaced by a refresh cycle.
///
/// Malformed rows are never an error: the parser skips them.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// The raw export could not be retrieved (login, navigation or download).
    #[error("Schedule fetch failed: {0}")]
    Fetch(String),

    /// The downloaded bytes are not a readable spreadsheet.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// The fetch did not complete within the configured bound.
    #[error("Schedule fetch timed out after {secs}s")]
    Timeout { secs: u64 },
}

pub type Result<T> = std::result::Result<T, TimetableError>;
