//! Domain models
//!
//! One module per entity, mirroring the relational schema. The `System`
//! is the root aggregate; everything else is owned by exactly one system.

pub mod bar;
pub mod order;
pub mod product;
pub mod system;
pub mod table;

pub use bar::{Bar, BarTableRelation, BarType};
pub use order::{Order, OrderLine, OrderStatus};
pub use product::{Product, ProductType};
pub use system::System;
pub use table::Table;
