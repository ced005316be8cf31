use shared::models::Table;
use sqlx::PgExecutor;

pub async fn list_by_system(
    ex: impl PgExecutor<'_>,
    system_id: i64,
) -> Result<Vec<Table>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tables WHERE system_id = $1 ORDER BY table_number")
        .bind(system_id)
        .fetch_all(ex)
        .await
}

pub async fn find_by_number(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    table_number: i32,
) -> Result<Option<Table>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tables WHERE system_id = $1 AND table_number = $2")
        .bind(system_id)
        .bind(table_number)
        .fetch_optional(ex)
        .await
}

pub async fn insert(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    table_number: i32,
) -> Result<Table, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO tables (system_id, table_number) VALUES ($1, $2) RETURNING *",
    )
    .bind(system_id)
    .bind(table_number)
    .fetch_one(ex)
    .await
}

pub async fn delete(ex: impl PgExecutor<'_>, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tables WHERE id = $1")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}
