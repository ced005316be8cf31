//! Order model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductType;

/// Order lifecycle state. Only PENDING → COMPLETED is exercised by the
/// current flows; IN_PROGRESS and CANCELLED are reserved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// Denormalized snapshot of a product at order time. Later catalog
/// edits never change historical orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub product_type: ProductType,
    pub quantity: u32,
}

impl OrderLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Order entity
///
/// A single patron submission produces up to two rows: one with only
/// drink lines (routed to the table's bar) and one with only food lines
/// (`bar_id` is NULL, the kitchen queue is system-wide).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub system_id: i64,
    pub table_id: i64,
    pub table_number: i32,
    pub bar_id: Option<i64>,
    pub status: OrderStatus,
    pub drinks: Vec<OrderLine>,
    pub foods: Vec<OrderLine>,
    pub total_price: Decimal,
    /// Epoch milliseconds.
    pub created_at: i64,
}
