//! Public types for the stats API
use std::collections::HashMap;

use serde::Serialize;

#[derive(Serialize)]
pub struct StatsResponse {
    pub total: usize,
    pub unread: usize,
    pub urgent: usize,
    pub processed: usize,
    pub categories: HashMap<String, usize>,
}
