use std::sync::Arc;

use crate::config::Config;
use crate::form::{LogSubmitAction, SubmitAction, Validator};
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_submit_action(config, Arc::new(LogSubmitAction))
    }

    /// Builds state around a caller-supplied submit action.
    pub fn with_submit_action(config: Config, submit_action: Arc<dyn SubmitAction>) -> Self {
        let validator = Validator::new(config.message_char_limit);
        let sessions = SessionStore::new(
            validator,
            submit_action,
            config.max_sessions,
            config.session_ttl(),
        );
        Self { config, sessions }
    }
}
