use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

pub const DUPLICATE_MESSAGE: &str = "Policy with this application number already exists";
pub const NOT_FOUND_MESSAGE: &str = "Policy not found";

/// Status plus client-facing message, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Map a service error for the named operation. Storage failures are
    /// logged here and replaced by `failure_message`, so no storage detail
    /// reaches the client.
    pub fn from_service(op: &'static str, failure_message: &'static str, e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::Duplicate(_) => Self::bad_request(DUPLICATE_MESSAGE),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            ServiceError::Db(msg) => {
                error!(op, err = %msg, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let e = JsonApiError::from_service("create", "Failed to add policy", ServiceError::Duplicate("A1".into()));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert!(e.message.to_lowercase().contains("application number"));

        let e = JsonApiError::from_service("delete", "Failed to delete policy", ServiceError::not_found("policy"));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.message, NOT_FOUND_MESSAGE);

        let e = JsonApiError::from_service("create", "Failed to add policy", ServiceError::Db("connection reset by peer".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.message, "Failed to add policy");
    }
}
