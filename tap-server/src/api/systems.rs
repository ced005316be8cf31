use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use shared::models::System;

use crate::auth::hash_password;
use crate::db;
use crate::error::{AppError, AppResponse, AppResult, ok};
use crate::state::AppState;

/// Credentials a freshly created system starts with; the admin screen
/// replaces them right away.
const DEFAULT_USER_PASSWORD: &str = "Bier!";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_SYSTEM_NAME: &str = "Nieuw systeem";

/// System row without the password hashes.
#[derive(Debug, Serialize)]
pub struct SystemSummary {
    pub id: i64,
    pub name: String,
    pub live: bool,
}

impl From<System> for SystemSummary {
    fn from(system: System) -> Self {
        Self {
            id: system.id,
            name: system.name,
            live: system.live,
        }
    }
}

pub async fn list_systems(
    State(state): State<AppState>,
) -> AppResult<Json<AppResponse<Vec<SystemSummary>>>> {
    let systems = db::systems::list(&state.pool).await?;
    Ok(ok(systems.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct SaveSystemRequest {
    /// None creates a new system.
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Plaintext; hashed before it reaches storage.
    pub user_password: Option<String>,
    pub admin_password: Option<String>,
    #[serde(default)]
    pub live: bool,
}

/// Create or update a system. Marking a system live clears the flag on
/// every other row in the same transaction; at most one system is live.
pub async fn save_system(
    State(state): State<AppState>,
    Json(payload): Json<SaveSystemRequest>,
) -> AppResult<Json<AppResponse<SystemSummary>>> {
    let user_hash = hash_optional(payload.user_password.as_deref())?;
    let admin_hash = hash_optional(payload.admin_password.as_deref())?;

    let mut tx = state.pool.begin().await?;

    let system = match payload.id {
        Some(id) => db::systems::update(
            &mut *tx,
            id,
            payload.name.as_deref(),
            user_hash.as_deref(),
            admin_hash.as_deref(),
            payload.live,
        )
        .await?
        .ok_or_else(|| AppError::not_found(format!("System {id} not found")))?,
        None => {
            let name = payload.name.as_deref().unwrap_or(DEFAULT_SYSTEM_NAME);
            let user_hash = match user_hash {
                Some(hash) => hash,
                None => hash(DEFAULT_USER_PASSWORD)?,
            };
            let admin_hash = match admin_hash {
                Some(hash) => hash,
                None => hash(DEFAULT_ADMIN_PASSWORD)?,
            };
            db::systems::create(&mut *tx, name, &user_hash, &admin_hash, payload.live).await?
        }
    };

    if system.live {
        db::systems::clear_live_except(&mut *tx, system.id).await?;
    }

    tx.commit().await?;

    state.live.invalidate();
    info!(system_id = system.id, live = system.live, "system saved");

    Ok(ok(system.into()))
}

pub async fn delete_system(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let affected = db::systems::delete(&state.pool, id).await?;
    if affected == 0 {
        return Err(AppError::not_found(format!("System {id} not found")));
    }

    state.live.invalidate();
    state.products.invalidate(id);
    info!(system_id = id, "system deleted");

    Ok(ok(true))
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

fn hash_optional(password: Option<&str>) -> AppResult<Option<String>> {
    password.map(hash).transpose()
}
