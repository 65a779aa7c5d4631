use std::sync::RwLock;

use crate::core::AppConfig;
use crate::pipeline::Pipeline;
use crate::store::MailStore;

pub struct AppState {
    pub store: RwLock<MailStore>,
    pub pipeline: Pipeline,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: MailStore, config: AppConfig) -> Self {
        Self {
            store: RwLock::new(store),
            pipeline: Pipeline::new(&config),
            config,
        }
    }
}
