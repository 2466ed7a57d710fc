//! # REST API for the Herd Occupancy Forecast

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::io::rest::error_response;
use crate::io::rest::mappers::ForecastMapper;
use crate::AppState;

pub async fn get_forecast(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/forecast");

    match state.forecast_service.forecast().await {
        Ok(forecast) => {
            let response = ForecastMapper::to_dto(forecast, state.forecast_service.settings());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("build forecast", e),
    }
}
