use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use registrar::config::{AppConfig, SHUTDOWN_GRACE};
use registrar::db::RegistrarDb;
use registrar::server::create_router;
use registrar::types::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = AppConfig::from_env();
    info!("Starting registrar with {:?}", config);

    let db = RegistrarDb::open(&config.db_path)
        .with_context(|| format!("failed to open database at {}", config.db_path))?;
    let app_state = Arc::new(AppState::new(db));
    let app = create_router(app_state.clone());

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        res = &mut server => {
            // The server stopped on its own, which only happens on error.
            res??;
        }
        _ = shutdown_signal() => {
            info!("Shutting down, waiting up to {:?} for in-flight requests", SHUTDOWN_GRACE);
            let _ = stop_tx.send(());

            match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
                Ok(Ok(Ok(()))) => info!("Server stopped"),
                Ok(Ok(Err(e))) => error!("Server error during shutdown: {}", e),
                Ok(Err(e)) => error!("Server task failed: {}", e),
                Err(_) => {
                    warn!("Shutdown grace period elapsed, aborting remaining requests");
                    server.abort();
                }
            }
        }
    }

    drop(app_state);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
