use axum::{Json, extract::State};

use shared::stats::{Statistics, aggregate};

use crate::db;
use crate::error::{AppResponse, AppResult, ok};
use crate::state::AppState;

/// Event statistics over every order of the live system, aggregated
/// on demand.
pub async fn get_statistics(
    State(state): State<AppState>,
) -> AppResult<Json<AppResponse<Statistics>>> {
    let system = state.require_live_system().await?;
    let orders = db::orders::list_by_system(&state.pool, system.id).await?;
    Ok(ok(aggregate(&orders)))
}
