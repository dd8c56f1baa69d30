//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Commands
        .route("/skip", post(skip_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        // Answers to the reminder prompt and the break countdown
        .route("/reminder/start", post(reminder_start_handler))
        .route("/reminder/skip", post(reminder_skip_handler))
        .route("/reminder/dismiss", post(reminder_dismiss_handler))
        .route("/break/cancel", post(break_cancel_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
