//! Shared application state for the solver server.

use std::sync::Arc;

use stepwise::core::types::Settings;

/// Shared state accessible from all request handlers.
///
/// Read-only after startup; every solve receives its own copy of the settings.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}
