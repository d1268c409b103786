use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use pills_reminder_backend::config::AppConfig;
use pills_reminder_backend::{create_router, create_rpc_router, initialize_backend, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logging::init(config.env)?;
    config.log_summary();

    let app_state = initialize_backend(&config).await?;

    let http_app = create_router(app_state.clone(), &config.http);
    let rpc_app = create_rpc_router(app_state).layer(TimeoutLayer::new(config.http.timeout()));

    let http_listener = TcpListener::bind(&config.http.address)
        .await
        .with_context(|| format!("failed to bind REST listener on {}", config.http.address))?;
    let rpc_listener = TcpListener::bind(&config.rpc.address)
        .await
        .with_context(|| format!("failed to bind RPC listener on {}", config.rpc.address))?;

    info!("REST API listening on http://{}", config.http.address);
    info!("JSON-RPC API listening on http://{}/rpc", config.rpc.address);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let http_shutdown = shutdown_rx.clone();
    let http_server = async move {
        axum::serve(http_listener, http_app)
            .with_graceful_shutdown(wait_for_shutdown(http_shutdown))
            .await
            .context("REST server failed")
    };
    let rpc_server = async move {
        axum::serve(rpc_listener, rpc_app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
            .await
            .context("RPC server failed")
    };

    tokio::try_join!(http_server, rpc_server)?;

    info!("Servers stopped");
    Ok(())
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl_c: {}", e);
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                error!("Failed to register SIGTERM handler: {}", e);
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }
}
