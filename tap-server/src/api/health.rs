use axum::Json;
use serde::Serialize;

use shared::util::now_millis;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: i64,
}

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        timestamp: now_millis(),
    })
}
