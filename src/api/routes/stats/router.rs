//! Router for the stats API

use std::sync::Arc;

use axum::{Router, extract::State, response::Json};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

async fn get_stats_handler(
    State(state): State<SharedState>,
) -> Result<Json<public::StatsResponse>, ApiError> {
    let mailbox = state
        .store
        .read()
        .expect("mail store lock poisoned")
        .stats();
    let processed = state.pipeline.processed_count().await;

    Ok(Json(public::StatsResponse {
        total: mailbox.total,
        unread: mailbox.unread,
        urgent: mailbox.urgent,
        processed,
        categories: mailbox.categories,
    }))
}

/// Create the stats router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(get_stats_handler))
}
