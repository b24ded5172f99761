use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /health — liveness probe with cache and timer status. No schedule content.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let refresh = state.refresh_state.borrow().clone();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "cached_for": state.refresher.cache().valid_for(),
        "refresh": refresh,
    }))
}

#[cfg(test)]
mod tests {
    use crate::app::build_router;
    use crate::testing::{state, FakePortal};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn reports_cache_date_once_warm() {
        let router = build_router(state(FakePortal::new(), Some("k")));

        let (status, health) = get_json(router.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["status"], "ok");
        assert!(health["cached_for"].is_null());
        assert_eq!(health["refresh"]["status"], "pending");

        let (_, schedule) = get_json(router.clone(), "/schedule?key=k").await;
        let (_, health) = get_json(router, "/health").await;
        assert_eq!(health["cached_for"], schedule["today"]["date"]);
    }
}
