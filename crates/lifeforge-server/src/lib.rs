//! LifeForge Server - personal dashboard backend
//!
//! Mounts the composed route tree of every app module as HTTP endpoints:
//! - `GET /api/<a>/<b>` for queries (input from the query string)
//! - `POST /api/<a>/<b>` for mutations (input from the JSON body)
//! - `GET /health` and `GET /routes` (route index)
//!
//! This crate can be used standalone (`forge server`) or embedded in tests
//! through [`build_app`].

pub mod api;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use lifeforge_core::state::{AppConfig, DEFAULT_LOCATION_API_URL};
use lifeforge_core::{AppState, AppStateInner, Database, ModuleRegistry, RouteTable};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const DEFAULT_PORT: u16 = 3636;
pub const DEFAULT_DB_PATH: &str = "lifeforge.db";

/// Configuration for the LifeForge backend server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    /// Boot credential, also accepted as bearer token by protected routes.
    pub master_key: Option<String>,
    pub location_api_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            db_path: DEFAULT_DB_PATH.to_string(),
            master_key: None,
            location_api_url: DEFAULT_LOCATION_API_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `MASTER_KEY`, `LIFEFORGE_DB_PATH` and
    /// `LOCATION_API_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            master_key: std::env::var("MASTER_KEY").ok(),
            db_path: std::env::var("LIFEFORGE_DB_PATH").unwrap_or(defaults.db_path),
            location_api_url: std::env::var("LOCATION_API_URL")
                .unwrap_or(defaults.location_api_url),
            host: defaults.host,
            port: defaults.port,
        }
    }
}

/// Create the shared `AppState`: database, module registry and runtime
/// settings. Fails when no master key is configured.
pub async fn create_app_state(config: &ServerConfig) -> Result<AppState, String> {
    let master_key = config
        .master_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| "MASTER_KEY is not set".to_string())?;

    let db = Database::open(&config.db_path)
        .map_err(|e| format!("Failed to open database: {}", e))?;

    let modules = ModuleRegistry::builtin()
        .map_err(|e| format!("Failed to load module manifests: {}", e))?;
    tracing::info!(modules = modules.len(), "module registry loaded");

    let mut app_config = AppConfig::new(master_key);
    app_config.location_api_url = config.location_api_url.clone();

    Ok(Arc::new(AppStateInner::new(db, Arc::new(modules), app_config)))
}

/// Compose every app module's router into the route table.
pub fn build_route_table() -> Result<RouteTable, String> {
    routes::app_router()
        .map(|router| router.into_table())
        .map_err(|e| format!("Failed to compose routes: {}", e))
}

/// The full HTTP application for `state` and `table`.
pub fn build_app(state: AppState, table: Arc<RouteTable>) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::api_router(api::ApiState { app: state, table })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the LifeForge backend server.
///
/// Returns the actual address the server is listening on.
pub async fn start_server(config: ServerConfig) -> Result<SocketAddr, String> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifeforge_server=info,tower_http=info".into()),
        )
        .try_init();

    tracing::info!(
        "Starting LifeForge backend server on {}:{}",
        config.host,
        config.port
    );

    let state = create_app_state(&config).await?;

    start_server_with_state(config, state).await
}

/// Start the HTTP server with a pre-built `AppState`.
pub async fn start_server_with_state(
    config: ServerConfig,
    state: AppState,
) -> Result<SocketAddr, String> {
    let table = Arc::new(build_route_table()?);
    tracing::info!(routes = table.len(), "route table composed");

    let app = build_app(state, table);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local address: {}", e))?;

    tracing::info!("LifeForge backend server listening on {}", local_addr);

    // Spawn the server in a background task
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}
