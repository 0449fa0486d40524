use std::net::SocketAddr;

use aeroclub_api::{app, worker, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aeroclub_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = aeroclub_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Aeroclub API on port {}", config.server.port);

    let state = AppState::new(config.scheduling.clone());

    // Reactive conflict re-detection on every booking change
    tokio::spawn(worker::start_revalidation_worker(state.clone()));

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
