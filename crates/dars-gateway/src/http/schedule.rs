//! Schedule endpoint — GET /schedule?key=<access key>
//!
//! Response: `{"today": {"date": "YYYY-MM-DD", "subjects": [...]}, "tomorrow": {...}}`
//! Errors are plain text and never carry internal detail:
//! 403 `Forbidden`, 500 `Failed to retrieve schedule`.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use dars_timetable::ScheduleResult;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

use crate::app::AppState;

#[derive(Deserialize)]
pub struct ScheduleQuery {
    pub key: Option<String>,
}

/// GET /schedule — today's cached result, refreshed on the first request of the day.
pub async fn schedule_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<Json<ScheduleResult>, (StatusCode, &'static str)> {
    // A query string that does not decode carries no usable key.
    let key = query.ok().and_then(|Query(q)| q.key);
    if !state.key_matches(key.as_deref()) {
        warn!(key_present = key.is_some(), "GET /schedule rejected: bad access key");
        return Err((StatusCode::FORBIDDEN, "Forbidden"));
    }

    match state.refresher.ensure_fresh(Local::now()).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!(error = %e, "GET /schedule failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve schedule",
            ))
        }
    }
}
