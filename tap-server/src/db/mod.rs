//! Database access layer
//!
//! Plain sqlx query functions, one module per entity. Every function
//! takes an executor so callers decide the transaction boundary:
//! services pass `&mut *tx` for grouped mutations and the pool for
//! single reads.

pub mod bars;
pub mod orders;
pub mod products;
pub mod relations;
pub mod systems;
pub mod tables;
