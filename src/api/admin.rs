//! Admin login and logout endpoints.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::{success, ApiResult};
use crate::auth::{verify_credentials, RequireAdmin};
use crate::errors::AppError;
use crate::models::{LoginResult, ADMIN_ROLE};
use crate::AppState;

/// Request body for POST /api/auth/login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/login - Exchange admin credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResult> {
    if !verify_credentials(&state.config, &request.username, &request.password) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let session = state
        .repo
        .create_admin_session(ADMIN_ROLE, state.config.session_ttl_hours)
        .await?;

    tracing::info!("Admin session created");

    success(LoginResult {
        token: session.token,
        expires_at: session.expires_at,
    })
}

/// POST /api/auth/logout - Revoke the presented session.
pub async fn logout(
    RequireAdmin(session): RequireAdmin,
    State(state): State<AppState>,
) -> ApiResult<()> {
    state.repo.delete_admin_session(&session.token).await?;
    success(())
}
