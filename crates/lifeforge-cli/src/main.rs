//! LifeForge CLI: `forge`.
//!
//! Reuses the same core domain logic (lifeforge-core), server bootstrap
//! (lifeforge-server) and typed client (lifeforge-client) as the web UI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lifeforge_cli::commands;
use lifeforge_client::ApiClient;
use lifeforge_core::locales::{LocaleStore, DEFAULT_LOCALES_DIR};
use lifeforge_core::registry::RegistryClient;

/// LifeForge CLI: personal dashboard tooling
#[derive(Parser)]
#[command(name = "forge", version, about = "LifeForge CLI: personal dashboard tooling")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the LifeForge HTTP backend server
    Server {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = lifeforge_server::DEFAULT_PORT)]
        port: u16,
        /// Path to the SQLite database file
        #[arg(long, env = "LIFEFORGE_DB_PATH", default_value = lifeforge_server::DEFAULT_DB_PATH)]
        db: String,
        /// Server credential and bearer token for protected routes
        #[arg(long, env = "MASTER_KEY", hide_env_values = true)]
        master_key: Option<String>,
    },

    /// Scaffold and inspect app modules
    Modules {
        #[command(subcommand)]
        action: ModulesAction,
    },

    /// Manage language packs
    Locales {
        /// Directory holding installed pack metadata
        #[arg(long, global = true, default_value = DEFAULT_LOCALES_DIR)]
        locales_dir: PathBuf,

        #[command(subcommand)]
        action: LocalesAction,
    },

    /// Show the authenticated package-registry user
    Whoami,

    /// Call a route by dotted path (e.g. "modules.list")
    Call {
        path: String,
        /// Route input as a JSON object
        #[arg(long, default_value = "{}")]
        input: String,
        /// Send as a mutation (POST) instead of a query (GET)
        #[arg(long)]
        mutation: bool,
        /// Bearer token for protected routes
        #[arg(long, env = "MASTER_KEY", hide_env_values = true)]
        token: Option<String>,
    },
}

#[derive(Subcommand)]
enum ModulesAction {
    /// Create a new module skeleton
    Create {
        /// Module name (kebab-case); prompted for when omitted
        #[arg(long)]
        name: Option<String>,
        /// Sidebar category; prompted for when omitted
        #[arg(long)]
        category: Option<String>,
        /// Parent directory for the new module
        #[arg(long, default_value = "modules")]
        dir: PathBuf,
        /// Skip `git init`
        #[arg(long)]
        no_git: bool,
    },
    /// List built-in modules and any found under --dir
    List {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum LocalesAction {
    /// List installed language packs
    List,
    /// Install a language pack, e.g. `forge locales install ms`
    Install { lang: String },
    /// Remove an installed language pack
    Uninstall { lang: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| lifeforge_cli::DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let result = if let Some(command) = cli.command {
        match command {
            Commands::Server {
                host,
                port,
                db,
                master_key,
            } => commands::server::run(host, port, db, master_key).await,

            Commands::Modules { action } => match action {
                ModulesAction::Create {
                    name,
                    category,
                    dir,
                    no_git,
                } => commands::modules::create(name, category, &dir, !no_git),
                ModulesAction::List { dir } => commands::modules::list(dir.as_deref()),
            },

            Commands::Locales {
                locales_dir,
                action,
            } => {
                let store = LocaleStore::new(locales_dir);
                match action {
                    LocalesAction::List => commands::locales::list(&store),
                    LocalesAction::Install { lang } => {
                        let registry = RegistryClient::from_env();
                        commands::locales::install(&registry, &store, &lang)
                            .await
                            .map(|_| ())
                    }
                    LocalesAction::Uninstall { lang } => commands::locales::uninstall(&store, &lang),
                }
            }

            Commands::Whoami => commands::whoami::run(&RegistryClient::from_env()).await,

            Commands::Call {
                path,
                input,
                mutation,
                token,
            } => match ApiClient::from_env() {
                Ok(client) => {
                    let client = match token {
                        Some(token) => client.with_token(token),
                        None => client,
                    };
                    commands::call::run(&client, &path, &input, mutation)
                        .await
                        .map(|_| ())
                }
                Err(e) => Err(e.to_string()),
            },
        }
    } else {
        // No subcommand: show help
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        Ok(())
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
