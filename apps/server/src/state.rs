//! Application state.

use std::sync::Arc;

use task_store::StorageGateway;

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Storage gateway that picks the backend serving each request.
    pub gateway: StorageGateway,
}

impl AppState {
    /// Creates new application state.
    pub fn new(config: Config, gateway: StorageGateway) -> Self {
        Self { config, gateway }
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<AppState>;
