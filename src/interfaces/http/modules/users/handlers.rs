//! User API handlers
//!
//! CRUD endpoints for users plus the user ↔ car association.
//! Delegates to `UserService` from the application layer.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::dto::{ListUsersParams, UserDto, UserRequest};
use crate::application::UserService;
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiError, ApiJson, ApiResponse, PaginatedResponse};
use crate::interfaces::http::modules::cars::CarDto;

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = PaginatedResponse<UserDto>)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<PaginatedResponse<UserDto>>, ApiError> {
    let result = state.user_service.search(params.into()).await?;
    Ok(Json(PaginatedResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    match state.user_service.find_by_id(id).await? {
        Some(user) => Ok(Json(ApiResponse::success(UserDto::from(user)))),
        None => Err(DomainError::user_not_found(id).into()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/cars",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Cars owned by the user", body = ApiResponse<Vec<CarDto>>),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_user_cars(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CarDto>>>, ApiError> {
    let cars = state.user_service.cars_of(id).await?;
    Ok(Json(ApiResponse::success(
        cars.into_iter().map(CarDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 409, description = "Email, login or an embedded license plate already in use"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ApiJson(request): ApiJson<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_service.create(request.into()).await?;
    let location = user
        .id
        .map(|id| format!("/api/v1/users/{}", id))
        .unwrap_or_default();

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Email, login or an embedded license plate already in use"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_service.update(id, request.into()).await?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted; their cars are kept without an owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/disassociate-car/{car_id}",
    tag = "Users",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("car_id" = Uuid, Path, description = "Car ID")
    ),
    responses(
        (status = 204, description = "Car released, or it was not owned by the user")
    )
)]
pub async fn disassociate_car(
    State(state): State<UserHandlerState>,
    Path((user_id, car_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state.user_service.disassociate_car(user_id, car_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::interfaces::http::test_support::{app, read_json, request};

    fn user(email: &str, login: &str, plates: &[&str]) -> Value {
        let cars: Vec<Value> = plates
            .iter()
            .map(|p| json!({"year": 2020, "license_plate": p, "model": "Gol", "color": "Red"}))
            .collect();
        json!({
            "first_name": "Alice",
            "last_name": "Liddell",
            "email": email,
            "login": login,
            "password": "h3ll0",
            "birthday": "1990-05-01",
            "cars": cars,
        })
    }

    async fn create(app: &axum::Router, body: Value) -> String {
        let resp = request(app, "POST", "/api/v1/users", Some(body)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.headers()["location"].to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_with_cars_and_list_them() {
        let app = app();
        let location = create(&app, user("a@x.com", "alice", &["AAA111", "BBB222"])).await;

        let resp = request(&app, "GET", &location, None).await;
        let body = read_json(resp).await;
        assert_eq!(body["data"]["login"], "alice");
        assert_eq!(body["data"]["birthday"], "1990-05-01");
        assert!(body["data"].get("password").is_none());
        assert!(body["data"].get("password_hash").is_none());

        let resp = request(&app, "GET", &format!("{}/cars", location), None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cars = read_json(resp).await;
        assert_eq!(cars["data"].as_array().unwrap().len(), 2);
        assert_eq!(cars["data"][0]["license_plate"], "AAA111");
    }

    #[tokio::test]
    async fn duplicate_email_and_rollback_are_visible_over_http() {
        let app = app();
        create(&app, user("a@x.com", "alice", &[])).await;

        let resp = request(&app, "POST", "/api/v1/users", Some(user("a@x.com", "bob", &[]))).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = request(
            &app,
            "POST",
            "/api/v1/users",
            Some(user("c@x.com", "carol", &["DUP001", "DUP001"])),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let users = read_json(request(&app, "GET", "/api/v1/users", None).await).await;
        assert_eq!(users["total"], 1);
        let cars = read_json(request(&app, "GET", "/api/v1/cars", None).await).await;
        assert_eq!(cars["total"], 0);
    }

    #[tokio::test]
    async fn embedded_car_violations_are_prefixed() {
        let app = app();
        let mut body = user("a@x.com", "alice", &["OK0001"]);
        body["cars"][0]["color"] = json!("");

        let resp = request(&app, "POST", "/api/v1/users", Some(body)).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json(resp).await;
        assert_eq!(body["violations"][0]["field"], "cars[0].color");
    }

    #[tokio::test]
    async fn delete_keeps_cars_and_disassociate_releases_one() {
        let app = app();
        let location = create(&app, user("a@x.com", "alice", &["KEEP01", "FREE01"])).await;
        let user_id = location.rsplit('/').next().unwrap().to_string();

        let cars = read_json(request(&app, "GET", &format!("{}/cars", location), None).await).await;
        let free = cars["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["license_plate"] == "FREE01")
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string();

        let uri = format!("/api/v1/users/{}/disassociate-car/{}", user_id, free);
        let resp = request(&app, "PUT", &uri, None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let car = read_json(request(&app, "GET", &format!("/api/v1/cars/{}", free), None).await).await;
        assert_eq!(car["data"]["user_id"], Value::Null);

        let resp = request(&app, "DELETE", &location, None).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let resp = request(&app, "GET", &location, None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let cars = read_json(request(&app, "GET", "/api/v1/cars", None).await).await;
        assert_eq!(cars["total"], 2);
        assert!(cars["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|c| c["user_id"].is_null()));
    }

    #[tokio::test]
    async fn update_keeps_id_and_rejects_taken_login() {
        let app = app();
        let alice = create(&app, user("a@x.com", "alice", &[])).await;
        create(&app, user("b@x.com", "bob", &[])).await;

        let resp = request(&app, "PUT", &alice, Some(user("a@x.com", "alice2", &[]))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert!(alice.ends_with(body["data"]["id"].as_str().unwrap()));
        assert_eq!(body["data"]["login"], "alice2");

        let resp = request(&app, "PUT", &alice, Some(user("a@x.com", "bob", &[]))).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
