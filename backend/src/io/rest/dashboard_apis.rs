//! # REST API for the Dashboard Queues

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{info, warn};

use shared::QueueKind;

use crate::io::rest::error_response;
use crate::io::rest::mappers::DashboardMapper;
use crate::AppState;

pub async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/dashboard");

    match state.dashboard_service.dashboard().await {
        Ok(snapshot) => (StatusCode::OK, Json(DashboardMapper::to_dashboard_dto(snapshot))).into_response(),
        Err(e) => error_response("build dashboard", e),
    }
}

/// A single queue, addressed by its slug (e.g. `pregnancy_check`)
pub async fn get_queue(State(state): State<AppState>, Path(slug): Path<String>) -> impl IntoResponse {
    info!("GET /api/dashboard/{}", slug);

    let Some(queue) = QueueKind::from_slug(&slug) else {
        warn!("Unknown queue: {}", slug);
        return (StatusCode::NOT_FOUND, format!("Unknown queue: {}", slug)).into_response();
    };

    match state.dashboard_service.queue(queue).await {
        Ok(snapshot) => (StatusCode::OK, Json(DashboardMapper::to_queue_view(snapshot))).into_response(),
        Err(e) => error_response("build queue", e),
    }
}
