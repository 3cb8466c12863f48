//! API error type with status mapping.
//!
//! Errors render as the standard envelope with `success: false`.

use crate::response::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use profile_core::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ApiResult<T> = Result<T, ApiError>;

/// Transport-level outcome of a failed request.
#[derive(Debug)]
pub enum ApiError {
    /// Field rule failures (400).
    Validation(Vec<String>),
    /// Email uniqueness violation (409).
    Conflict(Vec<String>),
    /// Unparseable id or body (400).
    BadRequest(String),
    /// No active profile (404).
    NotFound(String),
    /// Storage or other unexpected fault (500, logged).
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) | Self::Conflict(errors) => {
                write!(f, "validation failed: {}", errors.join("; "))
            }
            Self::BadRequest(message) | Self::NotFound(message) => f.write_str(message),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(_) => Self::Validation(value.messages()),
            RepoError::Conflict { .. } => Self::Conflict(value.messages()),
            RepoError::NotFound(_) => Self::NotFound("User not found".to_string()),
            RepoError::Db(_) | RepoError::InvalidData(_) => Self::Internal(value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(errors) | Self::Conflict(errors) => {
                ApiResponse::<()>::failure("Validation failed", Some(errors))
            }
            Self::BadRequest(message) | Self::NotFound(message) => {
                ApiResponse::<()>::failure(message, None)
            }
            Self::Internal(message) => {
                error!("event=http_error module=server status=error error={message}");
                ApiResponse::<()>::failure("Internal server error", None)
            }
        };

        body.with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use profile_core::{DbError, RepoError};

    #[test]
    fn conflict_is_409() {
        let err = ApiError::from(RepoError::Conflict {
            email: "a@b.co".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_is_404() {
        let err = ApiError::from(RepoError::NotFound(3));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_fault_is_500() {
        let err = ApiError::from(RepoError::Db(DbError::LockPoisoned));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_request_is_400() {
        let err = ApiError::BadRequest("Invalid user id".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
