use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::{
    error::AppError,
    state::AppState,
    templates::{html_escape, js_string, render},
};

/// `GET /`: dashboard for the first registered website.
///
/// The page itself is static; its script polls `/stats/{id}`.
#[tracing::instrument(skip_all)]
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let website = state
        .registry
        .first_website()
        .await?
        .ok_or(AppError::NotConfigured)?;

    let id_html = html_escape(&website.id);
    let id_js = js_string(&website.id);
    let name_html = html_escape(&website.name);

    let page = render(
        "dashboard.html",
        &[
            ("TRACKING_ID", id_html.as_str()),
            ("TRACKING_ID_JS", id_js.as_str()),
            ("WEBSITE_NAME", name_html.as_str()),
        ],
    )?;

    Ok(Html(page))
}

/// `GET /test`: demo page that loads the tracking script.
pub async fn test_page() -> Result<Html<String>, AppError> {
    Ok(Html(render("test1.html", &[])?))
}

/// `GET /test2`: second demo page, for multi-page sessions.
pub async fn test_page_2() -> Result<Html<String>, AppError> {
    Ok(Html(render("test2.html", &[])?))
}
