//! Bar and kitchen models

use serde::{Deserialize, Serialize};

/// Fulfillment queue type. A kitchen is a bar with type KITCHEN that
/// never appears in table routing: food orders are system-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BarType {
    Bar,
    Kitchen,
}

impl BarType {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "BAR" => Some(Self::Bar),
            "KITCHEN" => Some(Self::Kitchen),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Bar => "BAR",
            Self::Kitchen => "KITCHEN",
        }
    }
}

/// Bar entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub id: i64,
    pub system_id: i64,
    /// 1-based display number, unique per system per type as rendered.
    pub bar_number: i32,
    pub name: String,
    pub bar_type: BarType,
}

/// Join entity routing one table to one bar. At most one relation per
/// table; a table without a relation is unassigned and cannot receive
/// orders. Kitchens never take part in this relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BarTableRelation {
    pub id: i64,
    pub system_id: i64,
    pub table_id: i64,
    pub bar_id: i64,
}
