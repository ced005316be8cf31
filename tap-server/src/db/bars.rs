use shared::models::{Bar, BarType};
use sqlx::PgExecutor;

#[derive(sqlx::FromRow)]
struct BarRow {
    id: i64,
    system_id: i64,
    bar_number: i32,
    name: String,
    bar_type: String,
}

impl BarRow {
    fn into_model(self) -> Option<Bar> {
        let Some(bar_type) = BarType::from_db(&self.bar_type) else {
            tracing::warn!(bar_id = self.id, bar_type = %self.bar_type, "unknown bar type in storage, row skipped");
            return None;
        };
        Some(Bar {
            id: self.id,
            system_id: self.system_id,
            bar_number: self.bar_number,
            name: self.name,
            bar_type,
        })
    }
}

/// All bars and kitchens of a system.
pub async fn list_by_system(
    ex: impl PgExecutor<'_>,
    system_id: i64,
) -> Result<Vec<Bar>, sqlx::Error> {
    let rows: Vec<BarRow> =
        sqlx::query_as("SELECT * FROM bars WHERE system_id = $1 ORDER BY bar_type, bar_number")
            .bind(system_id)
            .fetch_all(ex)
            .await?;
    Ok(rows.into_iter().filter_map(BarRow::into_model).collect())
}

pub async fn find_by_number(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    bar_number: i32,
) -> Result<Option<Bar>, sqlx::Error> {
    let row: Option<BarRow> = sqlx::query_as(
        "SELECT * FROM bars WHERE system_id = $1 AND bar_number = $2 AND bar_type = 'BAR'",
    )
    .bind(system_id)
    .bind(bar_number)
    .fetch_optional(ex)
    .await?;
    Ok(row.and_then(BarRow::into_model))
}

/// Delete every bar/kitchen of the system whose id is not in `keep_ids`.
pub async fn delete_absent(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    keep_ids: &[i64],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bars WHERE system_id = $1 AND NOT (id = ANY($2))")
        .bind(system_id)
        .bind(keep_ids)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    bar_number: i32,
    name: &str,
    bar_type: BarType,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO bars (system_id, bar_number, name, bar_type)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(system_id)
    .bind(bar_number)
    .bind(name)
    .bind(bar_type.as_db())
    .fetch_one(ex)
    .await?;
    Ok(id)
}

pub async fn update(
    ex: impl PgExecutor<'_>,
    id: i64,
    bar_number: i32,
    name: &str,
    bar_type: BarType,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE bars SET bar_number = $2, name = $3, bar_type = $4 WHERE id = $1")
        .bind(id)
        .bind(bar_number)
        .bind(name)
        .bind(bar_type.as_db())
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn delete(ex: impl PgExecutor<'_>, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM bars WHERE id = $1")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}
