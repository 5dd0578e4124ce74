pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::webhook::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::home_handler))
        .route("/health", get(health::health_handler))
        // Twilio WhatsApp callback
        .route("/webhook", post(handlers::handle_webhook))
        .with_state(state)
}
