//! # REST API for the Milking-Parlor Stall Board

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use shared::AssignStallRequest;

use crate::domain::commands::animals::ListAnimalsQuery;
use crate::domain::stall_board::{milking_candidates, StallOccupant};
use crate::io::rest::error_response;
use crate::io::rest::mappers::StallMapper;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CandidateParams {
    pub search: Option<String>,
}

pub async fn get_stalls(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/stalls");

    let snapshot = state.stall_board.snapshot().await;
    (StatusCode::OK, Json(StallMapper::to_snapshot_dto(snapshot))).into_response()
}

pub async fn assign_stall(
    State(state): State<AppState>,
    Path(stall): Path<u32>,
    Json(request): Json<AssignStallRequest>,
) -> impl IntoResponse {
    info!("PUT /api/stalls/{} - request: {:?}", stall, request);

    let animal = match state.animal_service.get_animal(request.animal_id).await {
        Ok(animal) => animal,
        Err(e) => return error_response("assign stall", e),
    };

    let result = match StallOccupant::from_animal(&animal) {
        Ok(occupant) => state.stall_board.assign(stall, occupant).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(snapshot) => (StatusCode::OK, Json(StallMapper::to_snapshot_dto(snapshot))).into_response(),
        Err(e) => error_response("assign stall", e.into()),
    }
}

pub async fn release_stall(State(state): State<AppState>, Path(stall): Path<u32>) -> impl IntoResponse {
    info!("DELETE /api/stalls/{}", stall);

    match state.stall_board.release(stall).await {
        Ok(snapshot) => (StatusCode::OK, Json(StallMapper::to_snapshot_dto(snapshot))).into_response(),
        Err(e) => error_response("release stall", e.into()),
    }
}

/// Empty every stall, keeping the already-milked list
pub async fn clear_stalls(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/stalls");

    let snapshot = state.stall_board.clear_stalls().await;
    (StatusCode::OK, Json(StallMapper::to_snapshot_dto(snapshot))).into_response()
}

pub async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/stalls/history");

    let snapshot = state.stall_board.clear_history().await;
    (StatusCode::OK, Json(StallMapper::to_snapshot_dto(snapshot))).into_response()
}

pub async fn get_candidates(
    State(state): State<AppState>,
    Query(params): Query<CandidateParams>,
) -> impl IntoResponse {
    info!("GET /api/stalls/candidates - params: {:?}", params);

    let animals = match state.animal_service.list_animals(ListAnimalsQuery { active_only: true }).await {
        Ok(animals) => animals,
        Err(e) => return error_response("list milking candidates", e),
    };
    let board = state.stall_board.snapshot().await;

    let candidates = milking_candidates(&animals, &board, params.search.as_deref().unwrap_or(""));
    (StatusCode::OK, Json(StallMapper::to_candidates_dto(candidates))).into_response()
}
