//! `forge server`: Start the LifeForge HTTP backend server.

use lifeforge_server::ServerConfig;

pub async fn run(
    host: String,
    port: u16,
    db_path: String,
    master_key: Option<String>,
) -> Result<(), String> {
    let mut config = ServerConfig::from_env();
    config.host = host.clone();
    config.port = port;
    config.db_path = db_path;
    config.master_key = master_key;

    if config.master_key.as_deref().map(str::trim).unwrap_or("").is_empty() {
        return Err("MASTER_KEY is not set".to_string());
    }

    println!("Starting LifeForge server on {}:{}...", host, port);

    let addr = lifeforge_server::start_server(config).await?;
    println!("LifeForge server listening on http://{}", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
