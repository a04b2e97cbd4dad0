use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_api_rust::app::{app, AppState};
use todo_api_rust::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "todo-api-rust", version, about = "Todo list HTTP API with JWT authentication")]
struct Cli {
    /// Address to bind (overrides TODO_API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides TODO_API_PORT / PORT)
    #[arg(long, short)]
    port: Option<u16>,

    /// JSON file holding todo records (overrides TODO_TODOS_FILE)
    #[arg(long)]
    todos_file: Option<PathBuf>,

    /// JSON file holding user records (overrides TODO_USERS_FILE)
    #[arg(long)]
    users_file: Option<PathBuf>,
}

impl Cli {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = self.todos_file {
            config.storage.todos_file = path;
        }
        if let Some(path) = self.users_file {
            config.storage.users_file = path;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, TODO_API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::from_env());
    config
        .validate()
        .map_err(|msg| anyhow::anyhow!(msg))
        .context("invalid configuration")?;

    tracing::info!(
        environment = ?config.environment,
        todos = %config.storage.todos_file.display(),
        users = %config.storage.users_file.display(),
        "Starting Todo API"
    );

    let bind_addr = config.bind_addr();
    let app = app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Todo API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
