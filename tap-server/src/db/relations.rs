use shared::models::BarTableRelation;
use sqlx::PgExecutor;

pub async fn list_by_system(
    ex: impl PgExecutor<'_>,
    system_id: i64,
) -> Result<Vec<BarTableRelation>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM bar_table_relations WHERE system_id = $1")
        .bind(system_id)
        .fetch_all(ex)
        .await
}

/// The bar a table routes its drinks to, if assigned.
pub async fn bar_for_table(
    ex: impl PgExecutor<'_>,
    table_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT bar_id FROM bar_table_relations WHERE table_id = $1")
            .bind(table_id)
            .fetch_optional(ex)
            .await?;
    Ok(row.map(|(bar_id,)| bar_id))
}

pub async fn insert(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    table_id: i64,
    bar_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO bar_table_relations (system_id, table_id, bar_id) VALUES ($1, $2, $3)",
    )
    .bind(system_id)
    .bind(table_id)
    .bind(bar_id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn delete(ex: impl PgExecutor<'_>, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM bar_table_relations WHERE id = $1")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn count_for_table(
    ex: impl PgExecutor<'_>,
    table_id: i64,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM bar_table_relations WHERE table_id = $1")
            .bind(table_id)
            .fetch_one(ex)
            .await?;
    Ok(count)
}

pub async fn count_for_bar(ex: impl PgExecutor<'_>, bar_id: i64) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM bar_table_relations WHERE bar_id = $1")
            .bind(bar_id)
            .fetch_one(ex)
            .await?;
    Ok(count)
}
