use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::StoreError;

/// An error response with body `{"error": "<code>: <message>"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The `error` field of the response body.
    pub fn body_text(&self) -> String {
        format!("{}: {}", self.status.as_u16(), self.message)
    }
}

/// Client errors are reported as-is. Anything else is logged server-side and
/// the client only sees a generic message.
impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => {
                tracing::debug!("{}", e);
                Self::not_found(e.to_string())
            }
            StoreError::Validation { .. } | StoreError::Conflict(_) | StoreError::Reference(_) => {
                tracing::warn!("Rejected request: {}", e);
                Self::bad_request(e.to_string())
            }
            StoreError::Database(_) | StoreError::Internal(_) => {
                tracing::error!("Internal error: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Self::bad_request(format!("Validation error: {}", rejection.body_text()))
    }
}

/// Paths only match integer ids; anything else is treated as an unknown route.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Unmatched path parameter: {}", rejection.body_text());
        Self::not_found("Not found")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.body_text() });
        (self.status, Json(body)).into_response()
    }
}
