//! Shared application state.

use std::sync::Arc;

use crate::db::Database;
use crate::modules::ModuleRegistry;
use crate::store::{ApiKeyStore, SettingsStore};

/// Default upstream for `locations.search` (Google Places text search).
pub const DEFAULT_LOCATION_API_URL: &str = "https://places.googleapis.com/v1/places:searchText";

/// Runtime settings the route layer needs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server credential; also the bearer token accepted by protected routes.
    pub master_key: String,
    pub location_api_url: String,
}

impl AppConfig {
    pub fn new(master_key: impl Into<String>) -> Self {
        Self {
            master_key: master_key.into(),
            location_api_url: DEFAULT_LOCATION_API_URL.to_string(),
        }
    }
}

/// Shared state accessible by all route callbacks.
pub struct AppStateInner {
    pub db: Database,
    pub settings_store: SettingsStore,
    pub api_key_store: ApiKeyStore,
    pub modules: Arc<ModuleRegistry>,
    pub http: reqwest::Client,
    pub config: AppConfig,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    pub fn new(db: Database, modules: Arc<ModuleRegistry>, config: AppConfig) -> Self {
        Self {
            settings_store: SettingsStore::new(db.clone()),
            api_key_store: ApiKeyStore::new(db.clone()),
            modules,
            http: reqwest::Client::new(),
            config,
            db,
        }
    }
}
