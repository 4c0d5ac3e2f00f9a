use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use firetv_server::{
    AppState, create_app,
    infra::{
        config::{ConfigLoad, ConfigLoader, ConfigLoaderOptions},
        startup::{ProdStartupHooks, StartupHooks},
    },
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "firetv-server")]
#[command(
    about = "Trailer cache, metadata enrichment, watch parties and chapter relay for the Fire TV companion app"
)]
struct Cli {
    /// Path to a firetv.toml configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_server_with_hooks(cli, &ProdStartupHooks).await
}

async fn run_server_with_hooks<H>(cli: Cli, hooks: &H) -> anyhow::Result<()>
where
    H: StartupHooks,
{
    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: cli.config,
        env_file: cli.env_file,
    })
    .load()
    .context("failed to load configuration")?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!("loaded configuration from {}", path.display());
    }
    for warning in warnings.iter() {
        warn!("{}", warning);
    }

    let config = Arc::new(config);
    let state = AppState::from_config(Arc::clone(&config))
        .await
        .context("failed to initialise services")?;

    hooks.run(&state).await?;

    if config.dev_mode {
        warn!("DEV_MODE enabled: CORS is permissive");
    }

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .with_context(|| {
                format!(
                    "failed to bind {}:{}",
                    config.server.host, config.server.port
                )
            })?;
    info!(
        "Starting Fire TV companion server on {}",
        listener.local_addr()?
    );

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
