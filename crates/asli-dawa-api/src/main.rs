//! Asli Dawa API server.
//!
//! Startup order: configuration, catalog database, name cache, then the
//! listener. Any failure before the listener is bound exits the process.
//!
//! # Environment Variables
//! - `ASLI_DAWA_ADDR`: listen address (default: "0.0.0.0:5000")
//! - `ASLI_DAWA_DB_PATH`: SQLite catalog file (default: "asli_dawa.db")
//! - `RUST_LOG`: tracing filter

use std::sync::Arc;

use anyhow::Context;
use asli_dawa_api::{router, Config};
use asli_dawa_core::Catalog;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "asli_dawa_api=info,asli_dawa_core=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    info!(path = %config.db_path.display(), "opening medicine catalog");
    let catalog = Catalog::open(&config.db_path).context("failed to start catalog")?;
    info!(
        names = catalog.cached_name_count(),
        "name cache loaded, catalog ready"
    );

    let app = router(Arc::new(catalog));

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!("Server running on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
