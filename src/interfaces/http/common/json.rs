//! JSON extractor for Axum
//!
//! `ApiJson<T>` works like `axum::Json<T>`, but a body that cannot be parsed
//! is answered with a 400 in the standard [`ApiResponse`] envelope instead of
//! axum's plain-text rejection. Field rules are checked by the services, so
//! no validation happens here.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use super::ApiResponse;

pub struct ApiJson<T>(pub T);

/// Error type for `ApiJson` extraction failures.
pub struct ApiJsonRejection(JsonRejection);

impl IntoResponse for ApiJsonRejection {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", self.0.body_text()));
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ApiJsonRejection)?;

        Ok(ApiJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct TestBody {
        name: String,
    }

    async fn handler(ApiJson(body): ApiJson<TestBody>) -> String {
        body.name
    }

    async fn send(body: &'static str, content_type: &str) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = Router::new().route("/test", post(handler)).into_service();
        let req = Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        svc.call(req).await.unwrap()
    }

    #[tokio::test]
    async fn valid_body_is_extracted() {
        let resp = send(r#"{"name":"Alice"}"#, "application/json").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_body_is_enveloped_400() {
        let resp = send("not json", "application/json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn wrong_content_type_is_rejected() {
        let resp = send(r#"{"name":"Alice"}"#, "text/plain").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
