//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// Errors returned by the JSON API
#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    NotFound(String),
    /// Protected post without the right password
    Locked,
    AssistantDisabled,
    Internal(anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::NotFound(_)) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Store(StoreError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(StoreError::DuplicateSlug(_)) => StatusCode::CONFLICT,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Locked => StatusCode::FORBIDDEN,
            ApiError::AssistantDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Store(e) => e.to_string(),
            ApiError::NotFound(what) => format!("not found: {}", what),
            ApiError::Locked => "this post is password protected".to_string(),
            ApiError::AssistantDisabled => "assistant is not configured".to_string(),
            ApiError::Internal(e) => e.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.message());
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Store(StoreError::NotFound("x".into())), 404),
            (ApiError::Store(StoreError::Validation("x".into())), 422),
            (ApiError::Store(StoreError::DuplicateSlug("x".into())), 409),
            (ApiError::Store(StoreError::Remote("x".into())), 500),
            (ApiError::Locked, 403),
            (ApiError::AssistantDisabled, 503),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status().as_u16(), status);
        }
    }
}
