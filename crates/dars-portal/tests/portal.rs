// Exercise the login + download sequence against an in-process fake portal.

use std::collections::HashMap;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use dars_core::config::PortalConfig;
use dars_portal::{PortalError, PortalFetcher};
use dars_timetable::{ExportFetcher, TimetableError};

const LOGIN_FORM: &str =
    r#"<form method="post"><input name="login"><input name="password" type="password"></form>"#;
const EXPORT: &[u8] = b"PK\x03\x04not-really-a-workbook";

async fn login_page() -> Response {
    (
        [(header::SET_COOKIE, "pre=1; Path=/")],
        Html(LOGIN_FORM),
    )
        .into_response()
}

async fn login_submit(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    let has_pre = cookie(&headers).contains("pre=1");
    let ok = form.get("login").map(String::as_str) == Some("pupil")
        && form.get("password").map(String::as_str) == Some("hunter2");
    if has_pre && ok {
        (
            [(header::SET_COOKIE, "auth=ok; Path=/")],
            Html("<p>Xush kelibsiz</p>"),
        )
            .into_response()
    } else {
        Html(LOGIN_FORM).into_response()
    }
}

async fn export(headers: HeaderMap) -> Response {
    if cookie(&headers).contains("auth=ok") {
        EXPORT.to_vec().into_response()
    } else {
        Html(LOGIN_FORM).into_response()
    }
}

async fn broken_export() -> StatusCode {
    StatusCode::BAD_GATEWAY
}

fn cookie(headers: &HeaderMap) -> String {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ")
}

async fn spawn_portal() -> String {
    let app = Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/export", get(export))
        .route("/broken", get(broken_export));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(base: &str, password: &str, export_path: &str) -> PortalConfig {
    PortalConfig {
        login_url: format!("{base}/login"),
        export_url: format!("{base}{export_path}"),
        login: "pupil".to_string(),
        password: password.to_string(),
        login_field: "login".to_string(),
        password_field: "password".to_string(),
        user_agent: "dars-test".to_string(),
    }
}

#[tokio::test]
async fn downloads_export_with_session_cookies() {
    let base = spawn_portal().await;
    let fetcher = PortalFetcher::new(config(&base, "hunter2", "/export"));

    let bytes = fetcher.fetch_raw().await.unwrap();
    assert_eq!(bytes, EXPORT);
}

#[tokio::test]
async fn wrong_password_is_a_login_error() {
    let base = spawn_portal().await;
    let fetcher = PortalFetcher::new(config(&base, "wrong", "/export"));

    let err = fetcher.download().await.unwrap_err();
    assert!(matches!(err, PortalError::Login(_)), "got {err:?}");
}

#[tokio::test]
async fn failing_export_is_a_download_error() {
    let base = spawn_portal().await;
    let fetcher = PortalFetcher::new(config(&base, "hunter2", "/broken"));

    let err = fetcher.download().await.unwrap_err();
    assert!(matches!(err, PortalError::Download(_)), "got {err:?}");
}

#[tokio::test]
async fn errors_are_opaque_at_the_fetcher_seam() {
    let base = spawn_portal().await;
    let fetcher = PortalFetcher::new(config(&base, "wrong", "/export"));

    let err = fetcher.fetch_raw().await.unwrap_err();
    assert!(matches!(err, TimetableError::Fetch(_)));
}

#[tokio::test]
async fn unreachable_portal_is_an_http_error() {
    // Reserve a free port, then close it so nothing answers there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let fetcher = PortalFetcher::new(config(&format!("http://{addr}"), "hunter2", "/export"));

    let err = fetcher.download().await.unwrap_err();
    assert!(matches!(err, PortalError::Http(_)), "got {err:?}");
}
