//! Product model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product kind; decides which partition of an order a line lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductType {
    Drink,
    Food,
}

impl ProductType {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "DRINK" => Some(Self::Drink),
            "FOOD" => Some(Self::Food),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Drink => "DRINK",
            Self::Food => "FOOD",
        }
    }
}

/// Product entity
///
/// `product_id` is the stable external identifier used in order
/// payloads, distinct from the internal row id. Clients may generate it
/// optimistically before the product is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub system_id: i64,
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub product_type: ProductType,
    /// Display order, unique per type per system.
    pub position: i32,
}
