//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod interview;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::repository::InterviewStore;
use crate::service::pipeline::PipelineOrchestrator;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InterviewStore>,
    pub orchestrator: Arc<PipelineOrchestrator>,
}

impl AppState {
    pub fn new(store: Arc<dyn InterviewStore>, orchestrator: Arc<PipelineOrchestrator>) -> Self {
        Self {
            store,
            orchestrator,
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Interview endpoints
        .route("/interview/create", post(interview::create_interview))
        .route("/interview/list", get(interview::list_interviews))
        .route("/interview/{id}", get(interview::get_interview))
        .route("/interview/{id}/steps", get(interview::get_steps))
        .route("/interview/{id}/report", get(interview::get_report))
        // Processing endpoints
        .route("/interview/{id}/process", post(interview::process_interview))
        .route(
            "/interview/{id}/process-enhanced",
            post(interview::process_enhanced_interview),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
