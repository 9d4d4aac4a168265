//! Shared application state handed to every request handler.

use std::sync::Arc;

use crate::config::AppConfig;

/// Cheaply cloneable handle on the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration plus the shared HTTP client used
/// for upstream token requests.
pub struct AppState {
    config: AppConfig,
    http: reqwest::Client,
}

impl AppState {
    /// Construct the state wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            http: reqwest::Client::new(),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared HTTP client for upstream calls.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
