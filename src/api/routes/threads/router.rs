//! Router for the threads API

use std::sync::Arc;

use axum::{Router, extract::Path, extract::State, response::Json};

use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::store::Thread;

type SharedState = Arc<AppState>;

async fn get_thread_handler(
    State(state): State<SharedState>,
    Path(thread_id): Path<String>,
) -> Result<Json<Thread>, ApiError> {
    let thread = state
        .store
        .read()
        .expect("mail store lock poisoned")
        .thread_of(&thread_id)
        .ok_or_else(|| ApiError::NotFound(format!("Thread {}", thread_id)))?;

    Ok(Json(thread))
}

/// Create the threads router
pub fn router() -> Router<SharedState> {
    Router::new().route("/{thread_id}", axum::routing::get(get_thread_handler))
}
