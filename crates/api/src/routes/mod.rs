pub mod anniversary;
pub mod health;
pub mod push_config;
pub mod send_push;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(anniversary::router())
        .merge(send_push::router())
        .merge(push_config::router())
        .with_state(state)
}
