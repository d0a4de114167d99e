use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. Security headers on every response, including 404/405.
/// 2. `TraceLayer` for structured request/response logging via `tracing`.
/// 3. `CorsLayer`, only around `/track`: the tracking script is embedded on
///    third-party sites and posts cross-origin. The layer answers every
///    `OPTIONS /track` itself with `200 OK`.
pub fn build_app(state: Arc<AppState>) -> Router {
    let track = Router::new()
        .route("/track", post(routes::track::track))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        );

    Router::new()
        .route("/", get(routes::pages::dashboard))
        .route("/stats/{tracking_id}", get(routes::stats::get_stats))
        .route("/analytics.js", get(routes::script::analytics_script))
        .route("/test", get(routes::pages::test_page))
        .route("/test2", get(routes::pages::test_page_2))
        .route("/health", get(routes::health::health))
        .merge(track)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .with_state(state)
}
