//! # REST API for Animal Management
//!
//! Endpoints for registering, listing, correcting and deleting animals, and
//! for recording breeding events against them.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use shared::{AnimalEventRequest, CreateAnimalRequest, UpdateAnimalRequest};

use crate::domain::commands::animals::ListAnimalsQuery;
use crate::domain::AnimalError;
use crate::io::rest::error_response;
use crate::io::rest::mappers::{AnimalMapper, DashboardMapper};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListAnimalsParams {
    /// Only animals still in the herd
    pub active: Option<bool>,
}

pub async fn list_animals(
    State(state): State<AppState>,
    Query(params): Query<ListAnimalsParams>,
) -> impl IntoResponse {
    info!("GET /api/animals - params: {:?}", params);

    let query = ListAnimalsQuery { active_only: params.active.unwrap_or(false) };
    match state.animal_service.list_animals(query).await {
        Ok(animals) => (StatusCode::OK, Json(AnimalMapper::to_list_dto(animals))).into_response(),
        Err(e) => error_response("list animals", e),
    }
}

pub async fn create_animal(
    State(state): State<AppState>,
    Json(request): Json<CreateAnimalRequest>,
) -> impl IntoResponse {
    info!("POST /api/animals - request: {:?}", request);

    let command = match AnimalMapper::to_create_command(request) {
        Ok(command) => command,
        Err(e) => return error_response("create animal", AnimalError::from(e).into()),
    };

    match state.animal_service.create_animal(command).await {
        Ok(animal) => (
            StatusCode::CREATED,
            Json(AnimalMapper::to_response(animal, "Animal created successfully")),
        )
            .into_response(),
        Err(e) => error_response("create animal", e),
    }
}

pub async fn get_animal(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("GET /api/animals/{}", id);

    match state.animal_service.get_animal(id).await {
        Ok(animal) => (StatusCode::OK, Json(AnimalMapper::to_dto(animal))).into_response(),
        Err(e) => error_response("get animal", e),
    }
}

pub async fn update_animal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAnimalRequest>,
) -> impl IntoResponse {
    info!("PUT /api/animals/{} - request: {:?}", id, request);

    let command = match AnimalMapper::to_update_command(request) {
        Ok(command) => command,
        Err(e) => return error_response("update animal", AnimalError::from(e).into()),
    };

    match state.animal_service.update_details(id, command).await {
        Ok(animal) => (
            StatusCode::OK,
            Json(AnimalMapper::to_response(animal, "Animal updated successfully")),
        )
            .into_response(),
        Err(e) => error_response("update animal", e),
    }
}

pub async fn delete_animal(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("DELETE /api/animals/{}", id);

    match state.animal_service.delete_animal(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete animal", e),
    }
}

/// Record a breeding or lifecycle event
pub async fn record_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AnimalEventRequest>,
) -> impl IntoResponse {
    info!("POST /api/animals/{}/events - request: {:?}", id, request);

    let command = match AnimalMapper::to_breeding_command(request) {
        Ok(command) => command,
        Err(e) => return error_response("record event", AnimalError::from(e).into()),
    };

    match state.animal_service.apply_command(id, command).await {
        Ok(animal) => {
            let message = format!("Recorded {} for {}", command.name(), animal.name);
            (StatusCode::OK, Json(AnimalMapper::to_response(animal, message))).into_response()
        }
        Err(e) => error_response("record event", e),
    }
}

pub async fn get_milestones(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    info!("GET /api/animals/{}/milestones", id);

    match state.dashboard_service.milestones(id).await {
        Ok((today, animal, milestones)) => (
            StatusCode::OK,
            Json(DashboardMapper::to_milestones_response(today, animal, milestones)),
        )
            .into_response(),
        Err(e) => error_response("get milestones", e),
    }
}
