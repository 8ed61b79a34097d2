//! REST API handlers.
//!
//! Each handler decodes its payload, takes the service lock for the
//! duration of one matching operation, and maps the outcome to a status.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde_json::Value;

use carpool_scheduler::MatchingService;

use crate::error::ApiError;
use crate::{ApiState, payload};

type ApiResult = Result<Response, ApiError>;

// ── Status ─────────────────────────────────────────────────────

/// GET /status
pub async fn status(State(state): State<ApiState>) -> impl IntoResponse {
    let service = state.service.lock().await;
    Json(service.status())
}

// ── Cars ───────────────────────────────────────────────────────

/// PUT /cars
pub async fn load_cars(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let Json(json) = body?;
    let cars = payload::car_list(&json)?;
    let service = MatchingService::with_config(cars, &state.matching)?;

    *state.service.lock().await = service;
    Ok(StatusCode::OK.into_response())
}

// ── Journeys ───────────────────────────────────────────────────

/// POST /journey
pub async fn journey(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let Json(json) = body?;
    let group = payload::group(&json, state.matching.group_sizes.max)?;

    state.service.lock().await.add(group)?;
    Ok(StatusCode::OK.into_response())
}

/// POST /dropoff
pub async fn dropoff(
    State(state): State<ApiState>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> ApiResult {
    let Form(pairs) = body?;
    let id = payload::group_id(&pairs)?;

    state.service.lock().await.drop_off(id)?;
    Ok(StatusCode::OK.into_response())
}

/// POST /locate
pub async fn locate(
    State(state): State<ApiState>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> ApiResult {
    let Form(pairs) = body?;
    let id = payload::group_id(&pairs)?;

    match state.service.lock().await.locate(id)? {
        Some(car) => Ok(Json(car).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carpool_core::{Car, Group, GroupId, MatchingConfig};

    fn test_state(cars: &[(u64, u32)]) -> ApiState {
        let config = MatchingConfig::default();
        let service = MatchingService::with_config(
            cars.iter().map(|&(id, seats)| Car::new(id, seats)),
            &config,
        )
        .unwrap();
        ApiState::new(service, config)
    }

    fn form_id(id: &str) -> Result<Form<Vec<(String, String)>>, FormRejection> {
        Ok(Form(vec![("ID".to_string(), id.to_string())]))
    }

    #[tokio::test]
    async fn status_is_ok() {
        let state = test_state(&[(1, 4)]);
        let resp = status(State(state)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn load_cars_replaces_the_fleet() {
        let state = test_state(&[]);
        state.service.lock().await.add(Group::new(1, 2)).unwrap();

        let body = serde_json::json!([{"id": 1, "seats": 4}, {"id": 2, "seats": 6}]);
        let resp = load_cars(State(state.clone()), Ok(Json(body))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let service = state.service.lock().await;
        assert_eq!(service.status().cars, 2);
        assert!(service.locate(GroupId(1)).is_err());
    }

    #[tokio::test]
    async fn load_cars_rejects_duplicates() {
        let state = test_state(&[(9, 1)]);
        let body = serde_json::json!([{"id": 1, "seats": 4}, {"id": 1, "seats": 6}]);
        let err = load_cars(State(state.clone()), Ok(Json(body))).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "duplicate id: 1");

        // The previous fleet stays in place.
        assert_eq!(state.service.lock().await.available_seats(carpool_core::CarId(9)), Some(1));
    }

    #[tokio::test]
    async fn journey_conflict_on_duplicate() {
        let state = test_state(&[(1, 4)]);
        let body = serde_json::json!({"id": 1, "people": 4});

        let resp = journey(State(state.clone()), Ok(Json(body.clone()))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let err = journey(State(state), Ok(Json(body))).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn journey_rejects_sizes_outside_the_range() {
        let state = test_state(&[(1, 4)]);
        for people in [0, 7, 3006] {
            let body = serde_json::json!({"id": people, "people": people});
            let err = journey(State(state.clone()), Ok(Json(body))).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_string(), "expected people to be between 1 and 6");
        }

        let service = state.service.lock().await;
        assert_eq!(service.status().waiting, 0);
        assert_eq!(service.available_seats(carpool_core::CarId(1)), Some(4));
    }

    #[tokio::test]
    async fn dropoff_unknown_group_is_not_found() {
        let state = test_state(&[(1, 4)]);
        let err = dropoff(State(state), form_id("1")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn locate_outcomes() {
        let state = test_state(&[(2, 4)]);
        {
            let mut service = state.service.lock().await;
            service.add(Group::new(1, 4)).unwrap();
            service.add(Group::new(2, 4)).unwrap();
        }

        let resp = locate(State(state.clone()), form_id("1")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = locate(State(state.clone()), form_id("2")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let err = locate(State(state), form_id("3")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
