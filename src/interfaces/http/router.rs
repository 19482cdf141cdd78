//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, PaginatedResponse};
use super::modules::{cars, health, metrics as prom, users};
use crate::application::{CarService, UserService};
use crate::shared::FieldViolation;

/// Everything the HTTP layer needs from the running service.
pub struct ApiContext {
    pub user_service: Arc<UserService>,
    pub car_service: Arc<CarService>,
    /// Pinged by `/health`; `None` on in-memory storage
    pub db: Option<DatabaseConnection>,
    /// Serves `/metrics` when a Prometheus recorder is installed
    pub prometheus: Option<PrometheusHandle>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Users
        users::list_users,
        users::get_user,
        users::list_user_cars,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::disassociate_car,
        // Cars
        cars::list_cars,
        cars::get_car,
        cars::create_car,
        cars::update_car,
        cars::delete_car,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            FieldViolation,
            PaginatedResponse<users::UserDto>,
            PaginatedResponse<cars::CarDto>,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
            // Users
            users::UserDto,
            users::UserRequest,
            users::EmbeddedCarRequest,
            // Cars
            cars::CarDto,
            cars::CarRequest,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Users", description = "User registry and the cars attached to each user"),
        (name = "Cars", description = "Car registry"),
    ),
    info(
        title = "Car Registry API",
        version = "1.0.0",
        description = "REST API for registering users and their cars",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/cars", get(users::list_user_cars))
        .route(
            "/{user_id}/disassociate-car/{car_id}",
            put(users::disassociate_car),
        )
        .with_state(users::UserHandlerState {
            user_service: ctx.user_service,
        });

    let car_routes = Router::new()
        .route("/", get(cars::list_cars).post(cars::create_car))
        .route(
            "/{id}",
            get(cars::get_car)
                .put(cars::update_car)
                .delete(cars::delete_car),
        )
        .with_state(cars::CarHandlerState {
            car_service: ctx.car_service,
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db,
            started_at: Arc::new(Instant::now()),
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/cars", car_routes);

    if let Some(handle) = ctx.prometheus {
        router = router.route(
            "/metrics",
            get(prom::prometheus_metrics).with_state(prom::MetricsState { handle }),
        );
    }

    router
        .route_layer(middleware::from_fn(prom::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::interfaces::http::test_support::{app, read_json, request};

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        for expected in [
            "/health",
            "/api/v1/users",
            "/api/v1/users/{id}",
            "/api/v1/users/{id}/cars",
            "/api/v1/users/{user_id}/disassociate-car/{car_id}",
            "/api/v1/cars",
            "/api/v1/cars/{id}",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn health_reports_in_memory_storage() {
        let app = app();
        let resp = request(&app, "GET", "/health", None).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = read_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "in-memory");
    }

    #[tokio::test]
    async fn metrics_route_absent_without_recorder() {
        let resp = request(&app(), "GET", "/metrics", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_uuid_is_rejected() {
        let resp = request(&app(), "GET", "/api/v1/users/not-a-uuid", None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
