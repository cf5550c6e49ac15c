//! LifeForge Core: transport-agnostic domain logic for the LifeForge server.
//!
//! This crate contains the route layer (declaration, composition, request
//! context), the shared endpoint contracts, the module registry, locale-pack
//! metadata, the package-registry client and the SQLite stores. It has
//! **no HTTP framework dependency** by default, making it suitable for use in:
//!
//! - HTTP servers (via `lifeforge-server`)
//! - typed clients (via `lifeforge-client`, which only needs the contracts)
//! - CLI tools
//!
//! # Feature Flags
//!
//! - `axum`: Enables `IntoResponse` impl on `ServerError` for use in axum handlers.

pub mod api;
pub mod db;
pub mod error;
pub mod locales;
pub mod models;
pub mod modules;
pub mod registry;
pub mod rpc;
pub mod state;
pub mod store;

// Convenience re-exports
pub use db::Database;
pub use error::ServerError;
pub use modules::ModuleRegistry;
pub use rpc::{Endpoint, RouteTable, Router};
pub use state::{AppConfig, AppState, AppStateInner};
