use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use shared::models::{Order, OrderStatus};
use shared::order::{Basket, split_basket, unknown_product_ids};
use shared::util::now_millis;

use crate::db;
use crate::error::{AppError, AppResponse, AppResult, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub system_id: i64,
    /// Table number as the patron typed it.
    pub table: String,
    #[serde(default)]
    pub order: Basket,
}

#[derive(Debug, Serialize)]
pub struct OrderReceipt {
    pub drink_order_id: Option<i64>,
    pub food_order_id: Option<i64>,
    pub total_price: Decimal,
}

/// Place a patron order: split the basket by product type and persist
/// up to two PENDING rows sharing one timestamp. The drink row carries
/// the table's bar, the food row none; the kitchen queue is global.
pub async fn place_order(
    State(state): State<AppState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<AppResponse<OrderReceipt>>> {
    let products = state.catalog(payload.system_id).await?;

    let unknown = unknown_product_ids(&products, &payload.order);
    if !unknown.is_empty() {
        return Err(AppError::validation(format!(
            "unknown products in basket: {}",
            unknown.join(", ")
        )));
    }

    let table_number: i32 = payload
        .table
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("invalid table number: {:?}", payload.table)))?;

    let table = db::tables::find_by_number(&state.pool, payload.system_id, table_number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {table_number} not found")))?;
    let bar_id = db::relations::bar_for_table(&state.pool, table.id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Table {table_number} is not assigned to a bar"))
        })?;

    let split = split_basket(&products, &payload.order);
    let total_price = split.combined_total();

    if split.is_empty() {
        // Every quantity parsed to zero; nothing to persist or announce.
        return Ok(ok(OrderReceipt {
            drink_order_id: None,
            food_order_id: None,
            total_price,
        }));
    }

    let created_at = now_millis();
    let mut tx = state.pool.begin().await?;

    let mut drink_order_id = None;
    if !split.drinks.is_empty() {
        let id = db::orders::insert(
            &mut *tx,
            payload.system_id,
            table.id,
            Some(bar_id),
            &split.drinks,
            &[],
            split.drink_total(),
            created_at,
        )
        .await?;
        drink_order_id = Some(id);
    }

    let mut food_order_id = None;
    if !split.foods.is_empty() {
        let id = db::orders::insert(
            &mut *tx,
            payload.system_id,
            table.id,
            None,
            &[],
            &split.foods,
            split.food_total(),
            created_at,
        )
        .await?;
        food_order_id = Some(id);
    }

    tx.commit().await?;

    // Only after the commit: subscribers re-read from storage.
    state.bus.notify_order_activity();

    info!(
        system_id = payload.system_id,
        table_number,
        ?drink_order_id,
        ?food_order_id,
        %total_price,
        "order placed"
    );

    Ok(ok(OrderReceipt {
        drink_order_id,
        food_order_id,
        total_price,
    }))
}

#[derive(Debug, Serialize)]
pub struct SendOutcome {
    pub id: i64,
    pub status: OrderStatus,
}

/// Mark an order served. Unguarded by design: serving twice is a
/// no-op, serving a cancelled order revives it as served.
pub async fn send_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<SendOutcome>>> {
    let affected = db::orders::set_status(&state.pool, id, OrderStatus::Completed).await?;
    if affected == 0 {
        return Err(AppError::not_found(format!("Order {id} not found")));
    }

    state.bus.notify_order_activity();
    info!(order_id = id, "order completed");

    Ok(ok(SendOutcome {
        id,
        status: OrderStatus::Completed,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
}

impl SortQuery {
    /// Oldest first unless explicitly descending.
    fn ascending(&self) -> bool {
        self.sort.as_deref() != Some("desc")
    }
}

#[derive(Debug, Serialize)]
pub struct QueueView {
    pub system_id: i64,
    pub system_name: String,
    pub orders: Vec<Order>,
}

/// PENDING drink orders routed to one bar of the live system.
pub async fn bar_orders(
    State(state): State<AppState>,
    Path(bar_number): Path<i32>,
    Query(query): Query<SortQuery>,
) -> AppResult<Json<AppResponse<QueueView>>> {
    let system = state.require_live_system().await?;
    let bar = db::bars::find_by_number(&state.pool, system.id, bar_number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bar {bar_number} not found")))?;

    let orders =
        db::orders::list_pending_for_bar(&state.pool, system.id, bar.id, query.ascending())
            .await?;

    Ok(ok(QueueView {
        system_id: system.id,
        system_name: system.name,
        orders,
    }))
}

/// PENDING food orders of the live system. One global queue, never
/// bar-scoped.
pub async fn kitchen_orders(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
) -> AppResult<Json<AppResponse<QueueView>>> {
    let system = state.require_live_system().await?;
    let orders =
        db::orders::list_pending_for_kitchen(&state.pool, system.id, query.ascending()).await?;

    Ok(ok(QueueView {
        system_id: system.id,
        system_name: system.name,
        orders,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_ascending() {
        assert!(SortQuery { sort: None }.ascending());
        assert!(SortQuery { sort: Some("asc".into()) }.ascending());
        assert!(SortQuery { sort: Some("oldest".into()) }.ascending());
        assert!(!SortQuery { sort: Some("desc".into()) }.ascending());
    }
}
