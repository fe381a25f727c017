use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use holocron_core::DomainError;
use holocron_infra::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure a handler can signal.
///
/// Rendered as `{"error": true, "message": ...}`. Internal details are logged
/// and replaced with a fixed message before they reach the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::not_found("not found"),
            StoreError::Conflict(msg) => ApiError::BadRequest(msg),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(detail) => {
                // Do not leak implementation details to clients.
                tracing::error!(error = %detail, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        json_error(status, message)
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": true,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_renders_error_shape() {
        let resp = ApiError::not_found("Planet not found").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(resp).await,
            json!({"error": true, "message": "Planet not found"})
        );
    }

    #[tokio::test]
    async fn internal_details_are_redacted() {
        let resp = ApiError::from(StoreError::Backend("database error in get_user: disk I/O".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["message"], "Internal server error");
    }

    #[test]
    fn store_conflict_is_a_bad_request() {
        let err = ApiError::from(StoreError::Conflict("taken".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn domain_validation_is_a_bad_request() {
        let err = ApiError::from(DomainError::validation("`name` must not be blank"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "validation failed: `name` must not be blank");
    }
}
