#![allow(dead_code)]

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use coreserver::{AppState, config::Config, router};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub struct TestContext {
    pub temp_dir: TempDir,
    pub state: AppState,
    pub app: axum::Router,
}

pub async fn build_test_context() -> TestContext {
    let temp_dir = tempfile::tempdir().expect("temp dir should be created");
    let config = Config {
        products_path: temp_dir.path().join("products.json"),
        ..Config::with_db_dir(temp_dir.path())
    };

    let state = AppState::open(config).await.expect("stores should open");
    let app = router::app(state.clone());

    TestContext {
        temp_dir,
        state,
        app,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookie: Option<String>,
}

pub async fn request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let body = serde_json::from_slice::<Value>(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));

    TestResponse {
        status,
        body,
        set_cookie,
    }
}

pub fn assert_ok_envelope(body: &Value) {
    assert_eq!(body["success"], true, "unexpected body: {body}");
    assert_eq!(body["errno"], 0);
    assert_eq!(body["errmsg"], "");
}

pub fn assert_err_envelope(body: &Value, errno: u16) {
    assert_eq!(body["success"], false, "unexpected body: {body}");
    assert_eq!(body["errno"], errno);
    assert!(body["errmsg"].as_str().is_some_and(|m| !m.is_empty()));
}
