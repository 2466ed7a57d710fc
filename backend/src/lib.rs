//! # Herd Kiosk Backend
//!
//! Backend of a touchscreen kiosk that tracks a dairy herd through its
//! breeding cycle, shows which animals need attention today, keeps the
//! milking-parlor stall board and forecasts milking occupancy.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, mappers)
//!     ↓
//! Domain Layer (breeding engine, services, stall board)
//!     ↓
//! Storage Layer (SQLite via sqlx)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::{AppConfig, ServerConfig};
use crate::domain::{AnimalService, Clock, DashboardService, ForecastService, StallBoard, SystemClock};
use crate::storage::{AnimalRepository, AnimalStorage, DbConnection};

/// Services shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub animal_service: AnimalService,
    pub dashboard_service: DashboardService,
    pub forecast_service: ForecastService,
    pub stall_board: StallBoard,
}

impl AppState {
    pub fn new(storage: Arc<dyn AnimalStorage>, clock: Arc<dyn Clock>, config: &AppConfig) -> Self {
        Self {
            animal_service: AnimalService::new(storage.clone(), clock.clone()),
            dashboard_service: DashboardService::new(storage.clone(), clock.clone(), config.breeding),
            forecast_service: ForecastService::new(storage, clock.clone(), config.breeding, config.forecast),
            stall_board: StallBoard::new(config.parlor, clock),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database.url);
    let db = DbConnection::new(&config.database.url).await?;

    info!("Setting up domain model");
    let storage: Arc<dyn AnimalStorage> = Arc::new(AnimalRepository::new(db));
    let state = AppState::new(storage, Arc::new(SystemClock), config);

    info!(
        "Backend ready: {} stalls, {} forecast months",
        config.parlor.stall_count, config.forecast.months
    );
    Ok(state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, server: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = match server.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            warn!("Invalid CORS origin '{}', allowing any origin", server.cors_origin);
            cors.allow_origin(Any)
        }
    };

    let api_routes = Router::new()
        .route("/animals", get(io::list_animals).post(io::create_animal))
        .route(
            "/animals/:id",
            get(io::get_animal).put(io::update_animal).delete(io::delete_animal),
        )
        .route("/animals/:id/events", post(io::record_event))
        .route("/animals/:id/milestones", get(io::get_milestones))
        .route("/dashboard", get(io::get_dashboard))
        .route("/dashboard/:queue", get(io::get_queue))
        .route("/forecast", get(io::get_forecast))
        .route("/stalls", get(io::get_stalls).delete(io::clear_stalls))
        .route("/stalls/history", axum::routing::delete(io::clear_history))
        .route("/stalls/candidates", get(io::get_candidates))
        .route("/stalls/:stall", put(io::assign_stall).delete(io::release_stall));

    let mut router = Router::new().nest("/api", api_routes);
    if let Some(dir) = &server.static_dir {
        info!("Serving front-end from {}", dir.display());
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(cors).with_state(app_state)
}
