//! Public types for the mailbox API
use serde::{Deserialize, Serialize};

use crate::store::Email;

#[derive(Deserialize)]
pub struct EmailListQuery {
    pub filter: Option<String>,
}

#[derive(Serialize)]
pub struct EmailListResponse {
    pub emails: Vec<Email>,
}
