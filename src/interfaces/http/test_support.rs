use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use super::{create_api_router, ApiContext};
use crate::application::{CarService, UserService};
use crate::domain::Storage;
use crate::infrastructure::InMemoryStorage;

/// The full router over fresh in-memory storage, without database or metrics.
pub fn app() -> Router {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    create_api_router(ApiContext {
        user_service: Arc::new(UserService::new(storage.clone(), crate::config::BCRYPT_MIN_COST)),
        car_service: Arc::new(CarService::new(storage)),
        db: None,
        prometheus: None,
    })
}

pub async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.clone().oneshot(req).await.unwrap()
}

pub async fn read_json(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
