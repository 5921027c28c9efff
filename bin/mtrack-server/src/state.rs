//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use mtrack_remote::{RemoteConfigClient, SettingsStore};

use crate::config::Config;
use crate::store::LocalModelStore;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Locally tracked models (the non-remote data source).
    pub local: Arc<LocalModelStore>,
    /// Persisted remote connection settings.
    pub settings: Arc<SettingsStore>,
    /// Cache-aware remote config client.
    pub remote: Arc<RemoteConfigClient>,
}
