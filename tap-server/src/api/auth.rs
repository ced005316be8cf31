use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{Role, verify_password};
use crate::error::{AppError, AppResponse, AppResult, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub system_id: i64,
    pub system_name: String,
}

/// Password-only login against the live system. The user password
/// grants the patron role, the admin password the admin role.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let system = state.require_live_system().await?;

    let role = if verify_password(&payload.password, &system.user_password) {
        Role::User
    } else if verify_password(&payload.password, &system.admin_password) {
        Role::Admin
    } else {
        return Err(AppError::Unauthorized);
    };

    let token = state.sessions.issue(system.id, role);
    info!(system_id = system.id, ?role, "login succeeded");

    Ok(ok(LoginResponse {
        token,
        role,
        system_id: system.id,
        system_name: system.name,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> AppResult<Json<AppResponse<bool>>> {
    state.sessions.revoke(&payload.token);
    Ok(ok(true))
}
