use std::{path::Path, process::ExitCode};

use plant_server::{build_router, config::ENV_FILENAME, listen_addr, load_and_bootstrap, GlobalState};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let plants = match load_and_bootstrap(Path::new(ENV_FILENAME)).await {
        Ok(plants) => plants,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let pool = plants.pool().clone();

    let addr = listen_addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Could not bind {}: {}", addr, err);
            return ExitCode::FAILURE;
        }
    };
    info!("Listening on {}", addr);

    let app = build_router(GlobalState::new(plants));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    pool.close().await;
    info!("Database pool closed");

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Server error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received terminate signal"),
    }
    info!("Shutting down");
}
