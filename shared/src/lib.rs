//! Shared types for Tapkast
//!
//! Domain models and the pure parts of the order pipeline: basket
//! splitting, table-to-bar distribution helpers and statistics
//! aggregation. No I/O lives here; the server crate wires these into
//! persistence and the notification bus.

pub mod models;
pub mod order;
pub mod stats;
pub mod topology;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{Bar, BarType, Order, OrderLine, OrderStatus, Product, ProductType, System, Table};
