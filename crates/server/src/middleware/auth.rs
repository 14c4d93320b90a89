//! Bearer token extractor.
//!
//! Every contact route and the profile routes take [`RequireAuth`] as their
//! first argument, so the token is checked before the body is parsed or the
//! store is touched.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::Span;

use contact_book_core::UserId;

use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Yields the id of the user the token was issued to. The user is not loaded;
/// handlers that need the record fetch it themselves.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user_id): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {user_id}!")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAuth(pub UserId);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts);
        let user_id = state.auth().authenticate(token)?;

        Span::current().record("user_id", user_id.as_i32());
        set_sentry_user(&user_id);

        Ok(Self(user_id))
    }
}

/// The token from an `Authorization: Bearer <token>` header, if any.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}
