pub mod api_key_store;
pub mod settings_store;

pub use api_key_store::ApiKeyStore;
pub use settings_store::SettingsStore;
