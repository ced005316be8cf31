use shared::models::System;
use sqlx::PgExecutor;

pub async fn list(ex: impl PgExecutor<'_>) -> Result<Vec<System>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM systems ORDER BY id")
        .fetch_all(ex)
        .await
}

pub async fn find_by_id(
    ex: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<System>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM systems WHERE id = $1")
        .bind(id)
        .fetch_optional(ex)
        .await
}

/// The system currently flagged live, if any.
pub async fn find_live(ex: impl PgExecutor<'_>) -> Result<Option<System>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM systems WHERE live LIMIT 1")
        .fetch_optional(ex)
        .await
}

pub async fn create(
    ex: impl PgExecutor<'_>,
    name: &str,
    user_password: &str,
    admin_password: &str,
    live: bool,
) -> Result<System, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO systems (name, user_password, admin_password, live)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(name)
    .bind(user_password)
    .bind(admin_password)
    .bind(live)
    .fetch_one(ex)
    .await
}

/// Partial update: None leaves the stored value untouched.
pub async fn update(
    ex: impl PgExecutor<'_>,
    id: i64,
    name: Option<&str>,
    user_password: Option<&str>,
    admin_password: Option<&str>,
    live: bool,
) -> Result<Option<System>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE systems
         SET name = COALESCE($2, name),
             user_password = COALESCE($3, user_password),
             admin_password = COALESCE($4, admin_password),
             live = $5
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(user_password)
    .bind(admin_password)
    .bind(live)
    .fetch_optional(ex)
    .await
}

/// Only one system may be live; clears the flag on every other row.
pub async fn clear_live_except(ex: impl PgExecutor<'_>, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE systems SET live = FALSE WHERE id <> $1")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Cascades to products, bars, tables, relations and orders.
pub async fn delete(ex: impl PgExecutor<'_>, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM systems WHERE id = $1")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}
