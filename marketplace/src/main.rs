//! Artistly marketplace HTTP server.

use artistly_core::environment::SystemClock;
use artistly_marketplace::{
    config::Config,
    environment::UuidIdGenerator,
    server::{build_router, AppState},
    MarketplaceEnvironment, MarketplaceReducer, MarketplaceState,
};
use artistly_runtime::{metrics::MetricsServer, Store, StoreConfig};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before reading configuration
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "artistly_marketplace={level},artistly_runtime={level},tower_http=debug",
                    level = config.server.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Artistly marketplace");
    info!(
        host = %config.server.host,
        port = config.server.port,
        seed_sample_data = config.marketplace.seed_sample_data,
        "Configuration loaded"
    );

    if config.server.metrics_enabled {
        let server = MetricsServer::new(config.metrics_addr()?);
        server.start()?;
        info!(address = %server.addr(), "Metrics server started");
    }

    let initial_state = if config.marketplace.seed_sample_data {
        MarketplaceState::seeded()
    } else {
        MarketplaceState::new()
    };
    let environment = MarketplaceEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(UuidIdGenerator),
        config.settings(),
    );
    let store = Arc::new(Store::with_config(
        initial_state,
        MarketplaceReducer::new(),
        environment,
        StoreConfig::default().with_shutdown_timeout(config.shutdown_timeout()),
    ));

    let app = build_router(AppState::new(Arc::clone(&store)));

    let addr = config.server_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, draining effects");
    match store.shutdown(config.shutdown_timeout()).await {
        Ok(()) => info!("Store shut down cleanly"),
        Err(e) => warn!(error = %e, "Store shutdown incomplete"),
    }

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
