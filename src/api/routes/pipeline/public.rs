//! Public types for the pipeline API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Email;

/// Incoming email for `/process`. Unlike a stored `Email` the id is
/// optional; one is generated on upsert when absent.
#[derive(Deserialize)]
pub struct EmailPayload {
    #[serde(default)]
    pub id: Option<String>,
    pub subject: String,
    pub sender: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    pub body: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_read: bool,
}

impl EmailPayload {
    pub fn into_email(self, id: String) -> Email {
        Email {
            id,
            subject: self.subject,
            sender: self.sender,
            sender_name: self.sender_name,
            recipients: self.recipients,
            body: self.body,
            thread_id: self.thread_id,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            is_read: self.is_read,
            category: None,
            priority: None,
        }
    }
}

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub email: EmailPayload,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Deserialize)]
pub struct GenerateReplyRequest {
    pub email_id: String,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Deserialize)]
pub struct SendReplyRequest {
    pub email_id: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct SendReplyResponse {
    pub success: bool,
    pub email_id: String,
    pub sent_at: DateTime<Utc>,
}

/// Outbound email for `/send`. The sender is always the mailbox owner,
/// so only the message itself comes from the client.
#[derive(Deserialize)]
pub struct SendEmailRequest {
    pub subject: String,
    pub recipients: Vec<String>,
    pub body: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub email_id: String,
    pub sent_at: DateTime<Utc>,
}
