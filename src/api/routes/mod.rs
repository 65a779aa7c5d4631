//! API routes module

pub mod emails;
pub mod pipeline;
pub mod stats;
pub mod threads;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Mailbox routes
        .nest("/emails", emails::router())
        // Pipeline routes (process, generate-reply, send-reply)
        .merge(pipeline::router())
        // Thread routes
        .nest("/threads", threads::router())
        // Stats routes
        .nest("/stats", stats::router())
}
