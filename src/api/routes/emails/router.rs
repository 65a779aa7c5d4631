//! Router for the mailbox API

use std::sync::Arc;

use axum::{Router, extract::Path, extract::State, response::Json};
use axum_extra::extract::Query;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::store::{Category, Email, EmailFilter};

type SharedState = Arc<AppState>;

/// Parse the `filter` query param. `unread` and `urgent` are reserved
/// filter names and take precedence over the category of the same
/// name; anything else must be a known category.
fn parse_filter(raw: &str) -> Option<EmailFilter> {
    match raw.to_lowercase().as_str() {
        "unread" => Some(EmailFilter::Unread),
        "urgent" => Some(EmailFilter::Urgent),
        name => {
            let category = Category::parse(name);
            if category != Category::Other || name == "other" {
                Some(EmailFilter::Category(category))
            } else {
                None
            }
        }
    }
}

async fn list_emails_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::EmailListQuery>,
) -> Result<Json<public::EmailListResponse>, ApiError> {
    let filter = match &params.filter {
        Some(raw) => Some(
            parse_filter(raw)
                .ok_or_else(|| ApiError::Validation(format!("Unknown filter: {}", raw)))?,
        ),
        None => None,
    };

    let emails = state
        .store
        .read()
        .expect("mail store lock poisoned")
        .list(filter);

    Ok(Json(public::EmailListResponse { emails }))
}

async fn get_email_handler(
    State(state): State<SharedState>,
    Path(email_id): Path<String>,
) -> Result<Json<Email>, ApiError> {
    let email = state
        .store
        .read()
        .expect("mail store lock poisoned")
        .get(&email_id)
        .ok_or_else(|| ApiError::NotFound(format!("Email {}", email_id)))?;

    Ok(Json(email))
}

async fn mark_read_handler(
    State(state): State<SharedState>,
    Path(email_id): Path<String>,
) -> Result<Json<Email>, ApiError> {
    let email = state
        .store
        .write()
        .expect("mail store lock poisoned")
        .mark_read(&email_id)
        .ok_or_else(|| ApiError::NotFound(format!("Email {}", email_id)))?;

    Ok(Json(email))
}

/// Create the mailbox router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(list_emails_handler))
        .route("/{email_id}", axum::routing::get(get_email_handler))
        .route(
            "/{email_id}/mark-read",
            axum::routing::post(mark_read_handler),
        )
}
