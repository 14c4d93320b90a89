//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. The response body is always
//! `{"message": "..."}`; server-side failures are captured to Sentry and
//! reported to the client as a generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::contacts::ContactError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Contact operation failed.
    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this is a server-side failure rather than a client mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_) | AuthError::Token(_) | AuthError::PasswordHash
            ),
            Self::Contact(err) => matches!(err, ContactError::Repository(_)),
            Self::BadRequest(_) => false,
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        if self.is_internal() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidToken => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Contact(ContactError::NotFound | ContactError::OwnerNotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::Contact(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Never includes internal detail.
    #[must_use]
    pub fn message(&self) -> String {
        if self.is_internal() {
            return INTERNAL_MESSAGE.to_owned();
        }

        match self {
            Self::Auth(err) => err.to_string(),
            Self::Contact(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_internal() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;
    use crate::db::RepositoryError;

    async fn respond(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(ContactError::NotFound);
        assert_eq!(err.to_string(), "Contact error: Contact not found");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_auth_error_status_codes() {
        let status = |e: AuthError| AppError::from(e).status();

        assert_eq!(status(AuthError::MissingFields), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuthError::WeakPassword(6)), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuthError::PasswordMismatch), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuthError::EmailTaken), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::MissingToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::UserNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AuthError::PasswordHash),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_contact_error_status_codes() {
        assert_eq!(
            AppError::from(ContactError::Validation("name is required".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ContactError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ContactError::OwnerNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ContactError::Repository(RepositoryError::DataCorruption(
                "x".into()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_body_carries_message() {
        let (status, body) = respond(AppError::Auth(AuthError::InvalidCredentials)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Invalid credentials" }));

        let (status, body) = respond(AppError::Contact(ContactError::NotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Contact not found");
    }

    #[tokio::test]
    async fn test_internal_detail_is_hidden() {
        let err = AppError::from(ContactError::Repository(
            RepositoryError::DataCorruption("users.email row 12 is not an email".to_owned()),
        ));
        let (status, body) = respond(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Internal server error" }));
    }
}
