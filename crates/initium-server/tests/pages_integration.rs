use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use initium_core::config::Config;
use initium_core::store::DEFAULT_RETENTION_LIMIT;
use initium_metadata::{StaticRegistry, Website};
use initium_server::app::build_app;
use initium_server::state::AppState;
use initium_store::MemoryStore;

fn test_config(data_dir: &Path) -> Config {
    Config {
        port: 0,
        data_dir: data_dir.to_path_buf(),
        https: false,
        retention_limit: DEFAULT_RETENTION_LIMIT,
    }
}

async fn setup() -> (tempfile::TempDir, axum::Router) {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::open(test_config(dir.path()))
        .await
        .expect("open state");
    (dir, build_app(Arc::new(state)))
}

fn setup_with_registry(websites: Vec<Website>) -> axum::Router {
    let state = AppState::new(
        Arc::new(MemoryStore::default()),
        Arc::new(StaticRegistry::new(websites)),
        test_config(Path::new("/nonexistent")),
    );
    build_app(Arc::new(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

async fn text_body(response: axum::http::Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&text_body(response).await).expect("parse JSON")
}

fn content_type(response: &axum::http::Response<Body>) -> String {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// ============================================================
// BDD: Dashboard
// ============================================================
#[tokio::test]
async fn test_dashboard_renders_first_website() {
    let (_dir, app) = setup().await;

    let response = app.oneshot(get("/")).await.expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));
    let html = text_body(response).await;
    assert!(html.contains("<code>my-website</code>"));
    assert!(html.contains(r#"var trackingId = "my-website";"#));
    assert!(!html.contains("{{"), "unrendered placeholder left in page");
}

#[tokio::test]
async fn test_dashboard_escapes_website_id() {
    let app = setup_with_registry(vec![Website::new(
        "<b>\"x\"</b>",
        "localhost",
        "Evil & Co",
    )]);

    let html = text_body(app.oneshot(get("/")).await.expect("request")).await;

    assert!(html.contains("&lt;b&gt;&quot;x&quot;&lt;/b&gt;"));
    assert!(html.contains("Evil &amp; Co"));
    assert!(!html.contains("<b>\"x\"</b>"));
}

#[tokio::test]
async fn test_dashboard_empty_registry_is_server_error() {
    let app = setup_with_registry(vec![]);

    let response = app.oneshot(get("/")).await.expect("request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["code"], "not_configured");
}

#[tokio::test]
async fn test_dashboard_unreadable_registry_is_server_error() {
    let (dir, app) = setup().await;
    std::fs::remove_file(dir.path().join("websites.json")).expect("remove registry");

    let response = app.oneshot(get("/")).await.expect("request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["code"], "store_unavailable");
}

// ============================================================
// BDD: Tracking script
// ============================================================
#[tokio::test]
async fn test_script_embeds_id_and_origin() {
    let (_dir, app) = setup().await;

    let request = Request::builder()
        .method("GET")
        .uri("/analytics.js")
        .header("host", "stats.example.com:8080")
        .body(Body::empty())
        .expect("build request");
    let response = app.oneshot(request).await.expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/javascript"));
    let script = text_body(response).await;
    assert!(script.contains(r#"var trackingId = "my-website";"#));
    assert!(script.contains(r#"var endpoint = "http://stats.example.com:8080/track";"#));
    assert!(!script.contains("{{"));
}

#[tokio::test]
async fn test_script_uses_https_behind_tls_proxy() {
    let (_dir, app) = setup().await;

    let request = Request::builder()
        .method("GET")
        .uri("/analytics.js")
        .header("host", "stats.example.com")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .expect("build request");
    let script = text_body(app.oneshot(request).await.expect("request")).await;

    assert!(script.contains(r#""https://stats.example.com/track""#));
}

#[tokio::test]
async fn test_script_binds_first_registered_website() {
    let app = setup_with_registry(vec![
        Website::new("first", "a.example.com", "A"),
        Website::new("second", "b.example.com", "B"),
    ]);

    let script = text_body(app.oneshot(get("/analytics.js")).await.expect("request")).await;

    assert!(script.contains(r#"var trackingId = "first";"#));
    assert!(!script.contains("second"));
}

#[tokio::test]
async fn test_script_placeholder_in_website_id_stays_literal() {
    let app = setup_with_registry(vec![Website::new(
        "{{TRACK_ENDPOINT}}",
        "localhost",
        "Braces",
    )]);

    let script = text_body(app.oneshot(get("/analytics.js")).await.expect("request")).await;

    assert!(script.contains(r#"var trackingId = "{{TRACK_ENDPOINT}}";"#));
    assert!(script.contains(r#"var endpoint = "http://localhost:0/track";"#));
}

#[tokio::test]
async fn test_script_empty_registry_is_server_error() {
    let app = setup_with_registry(vec![]);
    let response = app.oneshot(get("/analytics.js")).await.expect("request");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================
// BDD: Test pages
// ============================================================
#[tokio::test]
async fn test_demo_pages_load_tracking_script() {
    let (_dir, app) = setup().await;

    for uri in ["/test", "/test2"] {
        let response = app.clone().oneshot(get(uri)).await.expect("request");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(content_type(&response).starts_with("text/html"));
        let html = text_body(response).await;
        assert!(html.contains(r#"<script src="/analytics.js" defer></script>"#));
    }
}

// ============================================================
// BDD: Security headers on every response
// ============================================================
#[tokio::test]
async fn test_security_headers_everywhere() {
    let (_dir, app) = setup().await;

    for (method, uri) in [
        ("GET", "/"),
        ("GET", "/stats/my-website"),
        ("GET", "/analytics.js"),
        ("GET", "/test"),
        ("GET", "/track"),
        ("POST", "/track"),
        ("OPTIONS", "/track"),
        ("GET", "/does-not-exist"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("build request");
        let response = app.clone().oneshot(request).await.expect("request");
        let headers = response.headers();
        let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        assert_eq!(get("x-content-type-options"), Some("nosniff"), "{method} {uri}");
        assert_eq!(get("x-frame-options"), Some("DENY"), "{method} {uri}");
        assert_eq!(get("x-xss-protection"), Some("1; mode=block"), "{method} {uri}");
    }
}

// ============================================================
// BDD: Health
// ============================================================
#[tokio::test]
async fn test_health_ok() {
    let (_dir, app) = setup().await;

    let response = app.oneshot(get("/health")).await.expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_degraded_when_store_corrupt() {
    let (dir, app) = setup().await;
    std::fs::write(dir.path().join("pageviews.json"), "garbage").expect("corrupt store");

    let response = app.oneshot(get("/health")).await.expect("request");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["status"], "degraded");
}
