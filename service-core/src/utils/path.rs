use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `Path` extractor that rejects with the `AppError` envelope instead of
/// axum's plain-text body.
pub struct PathParam<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(PathParam(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorResponse;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    async fn echo(PathParam(id): PathParam<String>) -> String {
        id
    }

    async fn get_path(uri: &str) -> (StatusCode, axum::body::Bytes) {
        let response = Router::new()
            .route("/items/:id", get(echo))
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes)
    }

    #[tokio::test]
    async fn extracts_segment() {
        let (status, bytes) = get_path("/items/abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(&bytes[..], b"abc");
    }

    #[tokio::test]
    async fn invalid_utf8_segment_renders_envelope() {
        let (status, bytes) = get_path("/items/%FF").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: ErrorResponse = serde_json::from_slice(&bytes).expect("Expected error envelope");
        assert_eq!(body.code, "validation");
    }
}
