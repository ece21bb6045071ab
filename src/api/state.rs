use std::time::Duration;

use crate::ai::SharedQueryEngine;
use crate::chat::SessionStore;
use crate::core::AppConfig;

pub struct AppState {
    pub sessions: SessionStore,
    // Built once at startup and shared by every request
    pub engine: SharedQueryEngine,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(engine: SharedQueryEngine, config: AppConfig) -> Self {
        Self {
            sessions: SessionStore::new(Duration::from_secs(config.session_ttl_secs)),
            engine,
            config,
        }
    }
}
