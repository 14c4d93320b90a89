//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (store reachable)
//!
//! # Auth
//! POST   /api/auth/register      - Register, returns {token}
//! POST   /api/auth/login         - Login, returns {token}
//! GET    /api/auth/me            - Current user (requires auth)
//! PUT    /api/auth/me            - Update name/email (requires auth)
//!
//! # Contacts (requires auth)
//! GET    /api/contacts           - List own contacts
//! POST   /api/contacts           - Create contact
//! PUT    /api/contacts/{id}      - Update contact
//! DELETE /api/contacts/{id}      - Delete contact
//! ```

pub mod auth;
pub mod contacts;
pub mod health;

use axum::{
    Router,
    extract::FromRequest,
    routing::{get, post, put},
};

use crate::error::AppError;
use crate::state::AppState;

/// JSON body extractor whose rejection is an [`AppError`], so malformed
/// bodies get the usual `{"message"}` response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me).put(auth::update_me))
}

/// Create the contact routes router.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(contacts::list).post(contacts::create))
        .route("/{id}", put(contacts::update).delete(contacts::delete))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/auth", auth_routes())
        .nest("/api/contacts", contact_routes())
}
