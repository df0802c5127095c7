//! Application-level error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::{RepositoryError, StatusUpdateError};
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;

/// Application error, converted into an HTTP response at the boundary.
///
/// Every handler returns `Result<_, AppError>`; the mapping to a status
/// code lives here and nowhere else. Server-side failures (5xx) are
/// captured to Sentry and logged; client errors are returned as-is.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),
}

impl From<StatusUpdateError> for AppError {
    fn from(e: StatusUpdateError) -> Self {
        match e {
            StatusUpdateError::Repository(e) => Self::Repository(e),
            StatusUpdateError::Transition(e) => Self::Order(OrderError::Transition(e)),
        }
    }
}

impl AppError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Repository(e) => match e {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Token(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Order(e) => match e {
                OrderError::EmptyItems => StatusCode::BAD_REQUEST,
                OrderError::CustomerNotFound | OrderError::OrderNotFound => StatusCode::NOT_FOUND,
                OrderError::Transition(_) => StatusCode::CONFLICT,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message exposed to the client. Internal details never leak.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_owned()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            sentry::capture_error(&self);
        }

        let body = Json(serde_json::json!({ "message": self.client_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greengrocer_core::{OrderStatus, StatusError};

    #[test]
    fn test_repository_not_found_is_404() {
        let err = AppError::Repository(RepositoryError::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_is_409() {
        let err = AppError::Repository(RepositoryError::Conflict("email already exists".into()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_terminal_transition_is_409() {
        let err = AppError::from(StatusUpdateError::Transition(StatusError::Terminal {
            from: OrderStatus::Delivered,
            to: OrderStatus::Shipping,
        }));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_credentials_is_401() {
        let err = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_empty_items_is_400() {
        let err = AppError::Order(OrderError::EmptyItems);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_errors_do_not_leak_details() {
        let err = AppError::Internal("pool exhausted at 10.0.0.3".into());
        assert_eq!(err.client_message(), "internal server error");
    }
}
