use axum::{routing::get, Router};
use dars_core::config::GatewayConfig;
use dars_scheduler::JobState;
use dars_timetable::Refresher;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::services::ServeDir;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: GatewayConfig,
    pub refresher: Arc<Refresher>,
    /// Live status of the daily refresh timer.
    pub refresh_state: watch::Receiver<JobState>,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        refresher: Arc<Refresher>,
        refresh_state: watch::Receiver<JobState>,
    ) -> Self {
        Self {
            config,
            refresher,
            refresh_state,
        }
    }

    /// True when `key` equals the configured access key.
    /// An unset or empty access key admits nobody.
    pub fn key_matches(&self, key: Option<&str>) -> bool {
        match (self.config.access_key.as_deref(), key) {
            (Some(expected), Some(given)) if !expected.is_empty() => expected == given,
            _ => false,
        }
    }
}

/// Assemble the full Axum router. Unmatched paths fall through to the static directory.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/schedule", get(crate::http::schedule::schedule_handler))
        .route("/health", get(crate::http::health::health_handler))
        .fallback_service(static_files)
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
