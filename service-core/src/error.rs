use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(anyhow::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(anyhow::Error),

    #[error("Timed out: {0}")]
    Timeout(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Stable, machine-readable error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::MethodNotAllowed(_) => "method_not_allowed",
            AppError::ServiceUnavailable(_) => "unavailable",
            AppError::Timeout(_) => "timeout",
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                "internal"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::InternalError(_) | AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(anyhow::anyhow!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        // Connectivity failures are reported separately from query failures.
        let connectivity = matches!(
            *err.kind,
            ErrorKind::ServerSelection { .. }
                | ErrorKind::Io(_)
                | ErrorKind::ConnectionPoolCleared { .. }
                | ErrorKind::DnsResolve { .. }
        );

        if connectivity {
            AppError::ServiceUnavailable(anyhow::Error::new(err))
        } else {
            AppError::DatabaseError(anyhow::Error::new(err))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        if status.is_server_error() {
            tracing::error!(code = code, error = %self, "Request failed");
        } else {
            tracing::debug!(code = code, error = %self, "Request rejected");
        }

        let message = match &self {
            AppError::ValidationError(err) => format!("Validation error: {}", err),
            AppError::BadRequest(err)
            | AppError::NotFound(err)
            | AppError::MethodNotAllowed(err) => err.to_string(),
            AppError::ServiceUnavailable(err) => format!("Storage unavailable: {}", err),
            AppError::Timeout(err) => err.to_string(),
            AppError::InternalError(err) => format!("Internal server error: {}", err),
            AppError::DatabaseError(err) => format!("Database error: {}", err),
            AppError::ConfigError(err) => format!("Configuration error: {}", err),
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(err: AppError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).expect("Invalid error envelope");
        (status, body)
    }

    #[tokio::test]
    async fn not_found_renders_code_and_message() {
        let (status, body) =
            body_of(AppError::NotFound(anyhow::anyhow!("Person not found"))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "not_found");
        assert_eq!(body.message, "Person not found");
    }

    #[tokio::test]
    async fn bad_request_is_a_validation_error() {
        let (status, body) = body_of(AppError::BadRequest(anyhow::anyhow!("bad id"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "validation");
    }

    #[tokio::test]
    async fn timeout_maps_to_gateway_timeout() {
        let (status, body) = body_of(AppError::Timeout(anyhow::anyhow!("too slow"))).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body.code, "timeout");
    }

    #[tokio::test]
    async fn database_errors_are_internal() {
        let (status, body) =
            body_of(AppError::DatabaseError(anyhow::anyhow!("write conflict"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "internal");
        assert!(body.message.contains("write conflict"));
    }

    #[tokio::test]
    async fn driver_argument_errors_are_internal() {
        let driver_err = mongodb::options::ClientOptions::parse("notmongo://x")
            .await
            .unwrap_err();

        let (status, body) = body_of(AppError::from(driver_err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "internal");
    }

    #[tokio::test]
    async fn driver_io_errors_are_unavailable() {
        let driver_err = mongodb::error::Error::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));

        let (status, body) = body_of(AppError::from(driver_err)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "unavailable");
        assert!(body.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn method_not_allowed_renders_envelope() {
        let (status, body) =
            body_of(AppError::MethodNotAllowed(anyhow::anyhow!("PUT /person"))).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body.code, "method_not_allowed");
    }

    #[test]
    fn io_errors_convert_to_internal() {
        let err = AppError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.code(), "internal");
    }
}
