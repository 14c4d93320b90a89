//! Account route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::ApiJson;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::Registration;
use crate::state::AppState;

/// Registration form.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Password confirmation.
    pub password2: Option<String>,
}

/// Login form.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile update. Absent or empty fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Body returned by register and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    let token = state
        .auth()
        .register(Registration {
            name: form.name.as_deref().unwrap_or_default(),
            email: form.email.as_deref().unwrap_or_default(),
            password: form.password.as_deref().unwrap_or_default(),
            password_confirm: form.password2.as_deref().unwrap_or_default(),
        })
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let token = state
        .auth()
        .login(
            form.email.as_deref().unwrap_or_default(),
            form.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// `GET /api/auth/me`
pub async fn me(RequireAuth(user_id): RequireAuth, State(state): State<AppState>) -> Result<Json<User>> {
    Ok(Json(state.auth().current_user(user_id).await?))
}

/// `PUT /api/auth/me`
pub async fn update_me(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
    ApiJson(form): ApiJson<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let user = state
        .auth()
        .update_profile(user_id, form.name.as_deref(), form.email.as_deref())
        .await?;

    Ok(Json(user))
}
