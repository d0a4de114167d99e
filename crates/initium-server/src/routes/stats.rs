use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use initium_core::analytics::{compute_stats, stats_cutoff, StatsSummary};

use crate::{error::AppError, state::AppState};

/// `GET /stats/{tracking_id}`: 30-day summary for one website.
///
/// Unknown ids are not an error: they simply match no records and produce an
/// all-zero summary. A store that cannot be read is a 500.
#[tracing::instrument(skip(state))]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(tracking_id): Path<String>,
) -> Result<Json<StatsSummary>, AppError> {
    let views = state.store.read_all().await?;
    let since = stats_cutoff(Utc::now());

    Ok(Json(compute_stats(&views, &tracking_id, since)))
}
