//! # REST API Interface Layer
//!
//! HTTP endpoints of the herd kiosk, all nested under `/api`.
//!
//! ## Error Translation
//!
//! Services return `anyhow::Error`; [`error_response`] downcasts to the typed
//! domain errors to pick the status code:
//!
//! - unknown animal, unknown queue: `404 Not Found`
//! - duplicate tag, cow already in another stall: `409 Conflict`
//! - invalid field, illegal breeding transition, bad stall number: `400 Bad Request`
//! - anything else: `500 Internal Server Error`

pub mod animal_apis;
pub mod dashboard_apis;
pub mod forecast_apis;
pub mod mappers;
pub mod stall_apis;

pub use animal_apis::*;
pub use dashboard_apis::*;
pub use forecast_apis::*;
pub use stall_apis::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::domain::models::AnimalValidationError;
use crate::domain::{AnimalError, StallBoardError};

pub(crate) fn error_response(action: &str, e: anyhow::Error) -> Response {
    error!("Failed to {}: {:#}", action, e);
    (status_for(&e), e.to_string()).into_response()
}

fn status_for(e: &anyhow::Error) -> StatusCode {
    if let Some(err) = e.downcast_ref::<AnimalError>() {
        return match err {
            AnimalError::NotFound(_) => StatusCode::NOT_FOUND,
            AnimalError::DuplicateTag(_) => StatusCode::CONFLICT,
            AnimalError::Validation(_) => StatusCode::BAD_REQUEST,
        };
    }
    if e.downcast_ref::<AnimalValidationError>().is_some() {
        return StatusCode::BAD_REQUEST;
    }
    if let Some(err) = e.downcast_ref::<StallBoardError>() {
        return match err {
            StallBoardError::AlreadyInStall { .. } => StatusCode::CONFLICT,
            StallBoardError::StallOutOfRange { .. } | StallBoardError::InactiveAnimal(_) => StatusCode::BAD_REQUEST,
        };
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::{AppConfig, ServerConfig};
    use crate::domain::clock::FixedClock;
    use crate::storage::{AnimalRepository, AnimalStorage, DbConnection};
    use crate::{create_router, AppState};

    async fn setup_test() -> Router {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let storage: Arc<dyn AnimalStorage> = Arc::new(AnimalRepository::new(db));
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()));
        let state = AppState::new(storage, clock, &AppConfig::default());
        create_router(state, &ServerConfig::default())
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |body| Body::from(body.to_string())))
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };
        (status, value)
    }

    async fn create_cow(router: &Router, name: &str, tag: &str) -> i64 {
        let (status, body) = send(
            router,
            "POST",
            "/api/animals",
            Some(json!({
                "name": name,
                "tag_number": tag,
                "birth_date": "2021-03-01",
                "calving_date": "2026-04-20",
                "insemination_date": null,
                "notes": null
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["animal"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_animal() {
        let router = setup_test().await;
        let id = create_cow(&router, "Resl", "AT 100").await;

        let (status, body) = send(&router, "GET", &format!("/api/animals/{}", id), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Resl");
        assert_eq!(body["calving_date"], "2026-04-20");
        assert_eq!(body["pregnancy_check"], "unset");
    }

    #[tokio::test]
    async fn test_animal_error_statuses() {
        let router = setup_test().await;
        create_cow(&router, "Resl", "AT 100").await;

        let (status, _) = send(
            &router,
            "POST",
            "/api/animals",
            Some(json!({ "name": "Susi", "tag_number": "AT 100", "birth_date": null,
                         "calving_date": null, "insemination_date": null, "notes": null })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &router,
            "POST",
            "/api/animals",
            Some(json!({ "name": "Susi", "tag_number": "AT 101", "birth_date": "01.02.2024",
                         "calving_date": null, "insemination_date": null, "notes": null })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, "GET", "/api/animals/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_record_events_and_milestones() {
        let router = setup_test().await;
        let id = create_cow(&router, "Vroni", "AT 200").await;

        let (status, body) = send(
            &router,
            "POST",
            &format!("/api/animals/{}/events", id),
            Some(json!({ "type": "record_insemination", "date": "2026-06-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["animal"]["insemination_attempts"], 1);

        let (status, _) = send(
            &router,
            "POST",
            &format!("/api/animals/{}/events", id),
            Some(json!({ "type": "record_dry_off", "date": "2026-06-10" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&router, "GET", &format!("/api/animals/{}/milestones", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2026-06-15");
        assert_eq!(body["milestones"]["pregnancy_check_due"], "2026-07-16");
        assert_eq!(body["milestones"]["days_until_pregnancy_check"], 31);
    }

    #[tokio::test]
    async fn test_list_and_delete_animals() {
        let router = setup_test().await;
        let id = create_cow(&router, "Anni", "AT 1").await;
        create_cow(&router, "Berti", "AT 2").await;

        let (status, body) = send(&router, "GET", "/api/animals?active=true", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["animals"].as_array().unwrap().len(), 2);

        let (status, _) = send(&router, "DELETE", &format!("/api/animals/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&router, "GET", "/api/animals", None).await;
        assert_eq!(body["animals"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_endpoints() {
        let router = setup_test().await;
        create_cow(&router, "Gitti", "AT 300").await;

        let (status, body) = send(&router, "GET", "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active_animals"], 1);
        assert_eq!(body["queues"].as_array().unwrap().len(), 8);

        // Calved 56 days ago with no heat on record
        let (status, body) = send(&router, "GET", "/api/dashboard/heat_observation", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["entries"][0]["animal"]["name"], "Gitti");

        let (status, _) = send(&router, "GET", "/api/dashboard/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_forecast_endpoint() {
        let router = setup_test().await;
        create_cow(&router, "Hilde", "AT 400").await;

        let (status, body) = send(&router, "GET", "/api/forecast", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["months"].as_array().unwrap().len(), 4);
        assert_eq!(body["months"][0]["weeks"][0]["milking"], 1);
        assert_eq!(body["thresholds"]["ideal"], 60);
        assert_eq!(body["months"][0]["level"], "below_min");
    }

    #[tokio::test]
    async fn test_stall_board_endpoints() {
        let router = setup_test().await;
        let id = create_cow(&router, "Kathi", "AT 500").await;
        create_cow(&router, "Liesl", "AT 501").await;

        let (status, body) = send(&router, "PUT", "/api/stalls/1", Some(json!({ "animal_id": id }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stalls"][0]["animal"]["name"], "Kathi");
        assert_eq!(body["already_milked"], json!([id]));

        let (status, _) = send(&router, "PUT", "/api/stalls/2", Some(json!({ "animal_id": id }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&router, "PUT", "/api/stalls/9", Some(json!({ "animal_id": id }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&router, "GET", "/api/stalls/candidates?search=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidates"][0]["animal"]["name"], "Liesl");
        assert_eq!(body["candidates"][1]["assigned_stall"], 1);

        let (status, body) = send(&router, "DELETE", "/api/stalls", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["already_milked"], json!([id]));

        let (status, body) = send(&router, "DELETE", "/api/stalls/history", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["already_milked"], json!([]));

        let (status, body) = send(&router, "GET", "/api/stalls", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stalls"].as_array().unwrap().len(), 7);
    }
}
