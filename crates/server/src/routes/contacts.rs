//! Contact route handlers.
//!
//! The id path segment is taken as a raw string; the service treats anything
//! that is not one of the caller's contact ids as not found.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use super::ApiJson;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Contact;
use crate::services::{ContactPatch, NewContact};
use crate::state::AppState;

/// Acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `GET /api/contacts`
pub async fn list(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Contact>>> {
    Ok(Json(state.contacts().list(user_id).await?))
}

/// `POST /api/contacts`
pub async fn create(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewContact>,
) -> Result<(StatusCode, Json<Contact>)> {
    let contact = state.contacts().create(user_id, input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// `PUT /api/contacts/{id}`
pub async fn update(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ContactPatch>,
) -> Result<Json<Contact>> {
    Ok(Json(state.contacts().update(user_id, &id, patch).await?))
}

/// `DELETE /api/contacts/{id}`
pub async fn delete(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.contacts().delete(user_id, &id).await?;
    Ok(Json(MessageResponse {
        message: "Contact deleted",
    }))
}
