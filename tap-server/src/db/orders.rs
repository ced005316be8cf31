use rust_decimal::Decimal;
use shared::models::{Order, OrderLine, OrderStatus};
use sqlx::PgExecutor;
use sqlx::types::Json;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    system_id: i64,
    table_id: i64,
    table_number: i32,
    bar_id: Option<i64>,
    status: String,
    drinks: Json<Vec<OrderLine>>,
    foods: Json<Vec<OrderLine>>,
    total_price: Decimal,
    created_at: i64,
}

impl OrderRow {
    fn into_model(self) -> Option<Order> {
        let Some(status) = OrderStatus::from_db(&self.status) else {
            tracing::warn!(order_id = self.id, status = %self.status, "unknown order status in storage, row skipped");
            return None;
        };
        Some(Order {
            id: self.id,
            system_id: self.system_id,
            table_id: self.table_id,
            table_number: self.table_number,
            bar_id: self.bar_id,
            status,
            drinks: self.drinks.0,
            foods: self.foods.0,
            total_price: self.total_price,
            created_at: self.created_at,
        })
    }
}

const SELECT_ORDER: &str = "SELECT o.id, o.system_id, o.table_id, t.table_number, o.bar_id,
            o.status, o.drinks, o.foods, o.total_price, o.created_at
     FROM orders o
     JOIN tables t ON t.id = o.table_id";

pub async fn insert(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    table_id: i64,
    bar_id: Option<i64>,
    drinks: &[OrderLine],
    foods: &[OrderLine],
    total_price: Decimal,
    created_at: i64,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO orders (system_id, table_id, bar_id, status, drinks, foods, total_price, created_at)
         VALUES ($1, $2, $3, 'PENDING', $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(system_id)
    .bind(table_id)
    .bind(bar_id)
    .bind(Json(drinks))
    .bind(Json(foods))
    .bind(total_price)
    .bind(created_at)
    .fetch_one(ex)
    .await?;
    Ok(id)
}

/// Set an order's status unconditionally. Returns the number of rows
/// touched so callers can distinguish "missing" from "done".
pub async fn set_status(
    ex: impl PgExecutor<'_>,
    order_id: i64,
    status: OrderStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
        .bind(order_id)
        .bind(status.as_db())
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// PENDING orders with drink lines for one bar, oldest first by default.
pub async fn list_pending_for_bar(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    bar_id: i64,
    ascending: bool,
) -> Result<Vec<Order>, sqlx::Error> {
    let direction = if ascending { "ASC" } else { "DESC" };
    let query = format!(
        "{SELECT_ORDER}
         WHERE o.system_id = $1 AND o.bar_id = $2 AND o.status = 'PENDING'
           AND jsonb_array_length(o.drinks) > 0
         ORDER BY o.created_at {direction}"
    );
    let rows: Vec<OrderRow> = sqlx::query_as(&query)
        .bind(system_id)
        .bind(bar_id)
        .fetch_all(ex)
        .await?;
    Ok(rows.into_iter().filter_map(OrderRow::into_model).collect())
}

/// PENDING orders with food lines, system-wide: the kitchen queue is
/// never bar-scoped.
pub async fn list_pending_for_kitchen(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    ascending: bool,
) -> Result<Vec<Order>, sqlx::Error> {
    let direction = if ascending { "ASC" } else { "DESC" };
    let query = format!(
        "{SELECT_ORDER}
         WHERE o.system_id = $1 AND o.status = 'PENDING'
           AND jsonb_array_length(o.foods) > 0
         ORDER BY o.created_at {direction}"
    );
    let rows: Vec<OrderRow> = sqlx::query_as(&query)
        .bind(system_id)
        .fetch_all(ex)
        .await?;
    Ok(rows.into_iter().filter_map(OrderRow::into_model).collect())
}

/// Every order of a system, for statistics aggregation.
pub async fn list_by_system(
    ex: impl PgExecutor<'_>,
    system_id: i64,
) -> Result<Vec<Order>, sqlx::Error> {
    let query = format!("{SELECT_ORDER} WHERE o.system_id = $1 ORDER BY o.created_at");
    let rows: Vec<OrderRow> = sqlx::query_as(&query)
        .bind(system_id)
        .fetch_all(ex)
        .await?;
    Ok(rows.into_iter().filter_map(OrderRow::into_model).collect())
}
