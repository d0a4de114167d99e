use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    state::AppState,
    templates::{js_string, render},
};

/// `GET /analytics.js`: the tracking snippet.
///
/// Bound to the first registered website. The beacon endpoint is derived
/// from the request's `Host` so the script posts back to whichever address
/// served it.
#[tracing::instrument(skip_all)]
pub async fn analytics_script(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let website = state
        .registry
        .first_website()
        .await?
        .ok_or(AppError::NotConfigured)?;

    let origin = request_origin(&headers, state.config.https, state.config.port);
    let tracking_id = js_string(&website.id);
    let endpoint = js_string(&format!("{origin}/track"));

    let script = render(
        "analytics.js",
        &[
            ("TRACKING_ID", tracking_id.as_str()),
            ("TRACK_ENDPOINT", endpoint.as_str()),
        ],
    )?;

    Ok((
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        script,
    ))
}

/// `scheme://host` of the current request.
///
/// HTTPS when a proxy reports `X-Forwarded-Proto: https` or the server is
/// configured with `INITIUM_HTTPS=true`.
pub fn request_origin(headers: &HeaderMap, force_https: bool, port: u16) -> String {
    let forwarded_https = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));
    let scheme = if force_https || forwarded_https {
        "https"
    } else {
        "http"
    };

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{port}"));

    format!("{scheme}://{host}")
}
