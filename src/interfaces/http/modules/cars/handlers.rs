//! Car API handlers
//!
//! Thin wrappers over `CarService`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::dto::{CarDto, CarRequest, ListCarsParams};
use crate::application::CarService;
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiError, ApiJson, ApiResponse, PaginatedResponse};

/// Car handler state
#[derive(Clone)]
pub struct CarHandlerState {
    pub car_service: Arc<CarService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/cars",
    tag = "Cars",
    params(ListCarsParams),
    responses(
        (status = 200, description = "Car list", body = PaginatedResponse<CarDto>)
    )
)]
pub async fn list_cars(
    State(state): State<CarHandlerState>,
    Query(params): Query<ListCarsParams>,
) -> Result<Json<PaginatedResponse<CarDto>>, ApiError> {
    let result = state.car_service.search(params.into()).await?;
    Ok(Json(PaginatedResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car details", body = ApiResponse<CarDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_car(
    State(state): State<CarHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CarDto>>, ApiError> {
    match state.car_service.find_by_id(id).await? {
        Some(car) => Ok(Json(ApiResponse::success(CarDto::from(car)))),
        None => Err(DomainError::car_not_found(id).into()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/cars",
    tag = "Cars",
    request_body = CarRequest,
    responses(
        (status = 201, description = "Car created", body = ApiResponse<CarDto>),
        (status = 409, description = "License plate already in use"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_car(
    State(state): State<CarHandlerState>,
    ApiJson(request): ApiJson<CarRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let car = state.car_service.create(request.into()).await?;
    let location = car
        .id
        .map(|id| format!("/api/v1/cars/{}", id))
        .unwrap_or_default();

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(CarDto::from(car))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    params(("id" = Uuid, Path, description = "Car ID")),
    request_body = CarRequest,
    responses(
        (status = 200, description = "Car updated", body = ApiResponse<CarDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "License plate already in use"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_car(
    State(state): State<CarHandlerState>,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<CarRequest>,
) -> Result<Json<ApiResponse<CarDto>>, ApiError> {
    let car = state.car_service.update(id, request.into()).await?;
    Ok(Json(ApiResponse::success(CarDto::from(car))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 204, description = "Car deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_car(
    State(state): State<CarHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.car_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::interfaces::http::test_support::{app, read_json, request};

    fn car(plate: &str) -> serde_json::Value {
        json!({"year": 2020, "license_plate": plate, "model": "Gol", "color": "Red"})
    }

    #[tokio::test]
    async fn create_returns_201_with_location() {
        let app = app();

        let resp = request(&app, "POST", "/api/v1/cars", Some(car("ABC123"))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let location = resp.headers()["location"].to_str().unwrap().to_string();

        let body = read_json(resp).await;
        let id = body["data"]["id"].as_str().unwrap();
        assert_eq!(location, format!("/api/v1/cars/{}", id));
        assert_eq!(body["data"]["user_id"], serde_json::Value::Null);

        let resp = request(&app, "GET", &location, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["data"]["license_plate"], "ABC123");
    }

    #[tokio::test]
    async fn duplicate_plate_is_409() {
        let app = app();
        request(&app, "POST", "/api/v1/cars", Some(car("ABC123"))).await;

        let resp = request(&app, "POST", "/api/v1/cars", Some(car("ABC123"))).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("ABC123"));
    }

    #[tokio::test]
    async fn invalid_payload_is_422_with_violations() {
        let app = app();
        let body = json!({"year": 0, "license_plate": "", "model": "Gol", "color": "Red"});

        let resp = request(&app, "POST", "/api/v1/cars", Some(body)).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = read_json(resp).await;
        let fields: Vec<_> = body["violations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["license_plate", "year"]);
    }

    #[tokio::test]
    async fn update_then_delete() {
        let app = app();
        let created = read_json(request(&app, "POST", "/api/v1/cars", Some(car("UPD001"))).await).await;
        let uri = format!("/api/v1/cars/{}", created["data"]["id"].as_str().unwrap());

        let mut changed = car("UPD001");
        changed["color"] = json!("Black");
        let resp = request(&app, "PUT", &uri, Some(changed)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["data"]["color"], "Black");

        let resp = request(&app, "DELETE", &uri, None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = request(&app, "DELETE", &uri, None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = request(&app, "GET", &uri, None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_filters_by_model() {
        let app = app();
        for (plate, model) in [("L1", "Gol"), ("L2", "Civic")] {
            let mut body = car(plate);
            body["model"] = json!(model);
            request(&app, "POST", "/api/v1/cars", Some(body)).await;
        }

        let resp = request(&app, "GET", "/api/v1/cars?model=civ&page_size=5", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["limit"], 5);
        assert_eq!(body["items"][0]["model"], "Civic");
    }

    #[tokio::test]
    async fn huge_page_number_yields_empty_page() {
        let app = app();
        request(&app, "POST", "/api/v1/cars", Some(car("P1"))).await;

        let uri = format!("/api/v1/cars?page={}", u64::MAX);
        let resp = request(&app, "GET", &uri, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"].as_array().unwrap().len(), 0);
    }
}
