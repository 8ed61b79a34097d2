//! API error types and their HTTP mapping.
//!
//! Error bodies are plain text so clients can show them verbatim.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::debug;

use carpool_scheduler::SchedulerError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request payload.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Scheduler(SchedulerError::DuplicateCar(_)) => StatusCode::BAD_REQUEST,
            ApiError::Scheduler(SchedulerError::DuplicateGroup(_)) => StatusCode::CONFLICT,
            ApiError::Scheduler(SchedulerError::MissingGroup(_)) => StatusCode::NOT_FOUND,
            ApiError::Scheduler(SchedulerError::Inconsistent(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::bad_request("expected content type to be json")
            }
            other => ApiError::bad_request(format!("invalid json\n{}", other.body_text())),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        match rejection {
            FormRejection::InvalidFormContentType(_) => {
                ApiError::bad_request("expected content type to be form urlencoded")
            }
            _ => ApiError::bad_request("expected one ID x-www-form-urlencoded parameter"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Scheduler(SchedulerError::Inconsistent(_)) => "internal error".to_string(),
            other => other.to_string(),
        };
        debug!(status = status.as_u16(), %message, "request rejected");
        (status, message).into_response()
    }
}
