//! bom-server - BOM explosion service
//!
//! Serves recursive bill-of-materials expansion, name translation, distinct
//! code listing and product catalog verification over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bom_common::config::{load_toml_config, ServiceConfig, DEFAULT_CONFIG_FILE};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bom_server::catalog::HttpCatalogClient;
use bom_server::db::{self, SqliteHierarchyStore};
use bom_server::translation::Translator;
use bom_server::{build_router, AppState};

/// Command-line arguments for bom-server
#[derive(Parser, Debug)]
#[command(name = "bom-server")]
#[command(about = "BOM explosion and product verification service")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "BOM_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Database URL (overrides config)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bom_server=info,bom_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting bom-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Err(e) = dotenv {
        info!(".env file not loaded ({}), using environment and config file", e);
    }

    let args = Args::parse();

    let toml_config = load_toml_config(&args.config)?;
    let mut config = ServiceConfig::resolve(&toml_config)?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    let pool = db::connect(&config.database_url).await?;
    info!("Database connected: {}", config.database_url);

    let translator = Arc::new(Translator::new(config.translation.clone()));
    info!(
        direct = %config.translation.direct_table.display(),
        fallback = %config.translation.fallback_table.display(),
        "Translation tables will load on first use"
    );

    let catalog = HttpCatalogClient::new(&config.catalog)
        .context("Failed to build catalog HTTP client")?;
    if catalog.is_configured() {
        info!(
            max_requests_per_second = config.catalog.max_requests_per_second,
            "Product catalog lookup configured"
        );
    } else {
        warn!("Product catalog lookup not configured; every verification will report NOT");
    }

    let state = AppState::new(
        Arc::new(SqliteHierarchyStore::new(pool)),
        translator,
        Arc::new(catalog),
        config.verification_delay,
    );
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("bom-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
