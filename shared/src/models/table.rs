//! Table model

use serde::{Deserialize, Serialize};

/// A numbered patron table. Tables are created and destroyed in bulk
/// when the admin changes the total table count; numbers are contiguous
/// from 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Table {
    pub id: i64,
    pub system_id: i64,
    pub table_number: i32,
}
