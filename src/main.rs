mod app_state;
mod database;
mod error;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod utils;
mod websocket;

use std::net::SocketAddr;
use std::sync::Arc;

use database::init::init_db;
use routes::app_routes::create_router;
use tokio::signal;
use tracing::{error, info};

// The main entry point for the application using the tokio runtime.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let db = match init_db().await {
        Ok(db) => {
            info!("database initialized");
            db
        }
        Err(e) => {
            error!("error initializing the database: {}", e);
            return;
        }
    };

    let app = create_router(Arc::new(db));

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("server running on http://{}", addr);

    if let Err(e) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {}", e);
    }
}

// A function to handle graceful shutdown by listening for termination signals.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("signal received, starting graceful shutdown");
}
