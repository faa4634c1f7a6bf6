//! Routes for the webhook server

pub mod callback;

use axum::{http::StatusCode, extract::State};

use crate::manager::RagState;
use crate::server::state::AppState;

/// Liveness greeting
pub async fn index() -> &'static str {
    "Drive answer bot is running."
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, String) {
    match state.manager().state() {
        Some(RagState::Ready(engine)) => (
            StatusCode::OK,
            format!("ready ({} chunks)", engine.index().len()),
        ),
        Some(RagState::NotReady(reason)) => (StatusCode::SERVICE_UNAVAILABLE, reason.to_string()),
        None => (StatusCode::SERVICE_UNAVAILABLE, "initializing".to_string()),
    }
}
