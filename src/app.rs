use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/channels", get(handlers::get_channels))
        .route("/api/period", get(handlers::get_period))
        .route("/api/fourier", get(handlers::get_fourier))
        .with_state(state)
}
