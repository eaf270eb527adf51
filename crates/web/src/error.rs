use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sources::SourceError;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Source(SourceError),
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "Result source error: {}", e),
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Invalid query: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
        }
    }
}

/// `field: message` for every failed rule, falling back to the rule code.
fn validation_details(errors: &ValidationErrors) -> Vec<String> {
    let mut details: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            failures.iter().map(move |failure| {
                let message = failure
                    .message
                    .as_deref()
                    .map(str::to_string)
                    .unwrap_or_else(|| failure.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    details.sort();
    details
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Source(SourceError::LiveQuery(msg)) => {
                tracing::error!("Live results query failed: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": "Results could not be loaded from the database",
                        "retry": true
                    }),
                )
            }
            Self::Storage(StorageError::NotFound) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Resource not found" }),
            ),
            Self::Source(_) | Self::Storage(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal error occurred" }),
                )
            }
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "details": validation_details(errors)
                }),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SourceError> for WebError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Storage(inner) => Self::Storage(inner),
            other => Self::Source(other),
        }
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type ApiResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_query_failure_is_bad_gateway() {
        let response =
            WebError::from(SourceError::LiveQuery("connection reset".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_storage_errors_are_unwrapped() {
        let error = WebError::from(SourceError::Storage(StorageError::NotFound));
        assert!(matches!(error, WebError::Storage(StorageError::NotFound)));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_request() {
        let response = WebError::BadRequest("page must be >= 1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
