//! Pushbell API server binary entrypoint.

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pushbell_common::config::AppConfig;

use pushbell_api::routes::create_router;
use pushbell_api::scheduler;
use pushbell_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("pushbell_api=debug,pushbell_engine=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting Pushbell API server...");

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let schedule_enabled = config.schedule_enabled;

    // Store and push clients are created lazily on the first request
    let state = AppState::new(config);

    if schedule_enabled {
        tokio::spawn(scheduler::run_daily(state.clone()));
    } else {
        tracing::info!("Daily anniversary schedule disabled");
    }

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("API server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    tracing::info!("Pushbell API server stopped.");
    Ok(())
}
