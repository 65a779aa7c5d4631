//! Router for the pipeline API: full processing, standalone reply
//! generation, and (mock) reply sending.

use std::sync::Arc;

use axum::{Router, extract::State, response::Json};
use chrono::Utc;
use uuid::Uuid;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::pipeline::ProcessingResult;
use crate::pipeline::reply::{Reply, Tone};
use crate::store::Email;

type SharedState = Arc<AppState>;

async fn process_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ProcessRequest>,
) -> Result<Json<ProcessingResult>, ApiError> {
    if payload.email.subject.trim().is_empty() {
        return Err(ApiError::Validation("Email subject is required".to_string()));
    }
    if payload.email.sender.trim().is_empty() {
        return Err(ApiError::Validation("Email sender is required".to_string()));
    }

    let tone = Tone::parse(payload.tone.as_deref());
    let id = payload
        .email
        .id
        .clone()
        .unwrap_or_else(|| format!("email-{}", Uuid::new_v4()));

    // Upsert unseen emails; reuse the stored copy otherwise so the
    // read flag and any attached classification survive reprocessing
    let email = {
        let mut store = state.store.write().expect("mail store lock poisoned");
        match store.get(&id) {
            Some(existing) => existing,
            None => {
                let email = payload.email.into_email(id);
                store.upsert(email.clone());
                email
            }
        }
    };

    let result = state.pipeline.process(&state.store, &email, tone).await;
    Ok(Json(result))
}

async fn generate_reply_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::GenerateReplyRequest>,
) -> Result<Json<Reply>, ApiError> {
    let tone = Tone::parse(payload.tone.as_deref());
    let reply = state
        .pipeline
        .generate_reply(&state.store, &payload.email_id, tone)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Email {}", payload.email_id)))?;

    Ok(Json(reply))
}

/// "Send" a reply. There is no outbound mail in this demo; the
/// content is accepted verbatim and the source email is marked read.
async fn send_reply_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::SendReplyRequest>,
) -> Result<Json<public::SendReplyResponse>, ApiError> {
    state
        .store
        .write()
        .expect("mail store lock poisoned")
        .mark_read(&payload.email_id)
        .ok_or_else(|| ApiError::NotFound(format!("Email {}", payload.email_id)))?;

    tracing::debug!(email_id = %payload.email_id, "Reply sent");

    Ok(Json(public::SendReplyResponse {
        success: true,
        email_id: payload.email_id,
        sent_at: Utc::now(),
    }))
}

/// Compose a new outbound email. Like `/send-reply` nothing actually
/// leaves the process; the email is stored as already read with the
/// mailbox owner as sender, so it shows up in its thread.
async fn send_email_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::SendEmailRequest>,
) -> Result<Json<public::SendEmailResponse>, ApiError> {
    if payload.subject.trim().is_empty() {
        return Err(ApiError::Validation("Email subject is required".to_string()));
    }

    let email = Email {
        id: format!("email-{}", Uuid::new_v4()),
        subject: payload.subject,
        sender: "you@company.com".to_string(),
        sender_name: "You".to_string(),
        recipients: payload.recipients,
        body: payload.body,
        thread_id: payload.thread_id,
        timestamp: Utc::now(),
        is_read: true,
        category: None,
        priority: None,
    };
    let email_id = email.id.clone();

    state
        .store
        .write()
        .expect("mail store lock poisoned")
        .upsert(email);

    tracing::debug!(email_id = %email_id, "Email sent");

    Ok(Json(public::SendEmailResponse {
        success: true,
        email_id,
        sent_at: Utc::now(),
    }))
}

/// Create the pipeline router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/process", axum::routing::post(process_handler))
        .route("/generate-reply", axum::routing::post(generate_reply_handler))
        .route("/send-reply", axum::routing::post(send_reply_handler))
        .route("/send", axum::routing::post(send_email_handler))
}
