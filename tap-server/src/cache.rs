//! Process-wide caches
//!
//! Explicit cache components injected through [`crate::state::AppState`]
//! instead of ambient globals. Both are invalidated synchronously after
//! every successful write; with a single-instance deployment that is
//! the only staleness source to care about.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use shared::models::{Product, System};

/// Per-system product list cache used by order placement.
#[derive(Debug, Default)]
pub struct ProductCache {
    inner: DashMap<i64, Arc<Vec<Product>>>,
}

impl ProductCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, system_id: i64) -> Option<Arc<Vec<Product>>> {
        self.inner.get(&system_id).map(|e| Arc::clone(e.value()))
    }

    pub fn insert(&self, system_id: i64, products: Vec<Product>) -> Arc<Vec<Product>> {
        let products = Arc::new(products);
        self.inner.insert(system_id, Arc::clone(&products));
        products
    }

    /// Called after every successful catalog save.
    pub fn invalidate(&self, system_id: i64) {
        self.inner.remove(&system_id);
    }
}

/// Cached result of the live-system lookup. The outer Option tracks
/// whether the lookup is cached at all; the inner one whether a live
/// system exists.
#[derive(Debug, Default)]
pub struct LiveSystemCache {
    inner: RwLock<Option<Option<System>>>,
}

impl LiveSystemCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Option<System>> {
        self.inner.read().expect("live cache poisoned").clone()
    }

    pub fn set(&self, system: Option<System>) {
        *self.inner.write().expect("live cache poisoned") = Some(system);
    }

    /// Called after every system settings save or delete.
    pub fn invalidate(&self) {
        *self.inner.write().expect("live cache poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::ProductType;

    fn product(system_id: i64, product_id: &str) -> Product {
        Product {
            id: 1,
            system_id,
            product_id: product_id.to_string(),
            name: "Bier".to_string(),
            price: Decimal::new(300, 2),
            product_type: ProductType::Drink,
            position: 0,
        }
    }

    #[test]
    fn product_cache_round_trip_and_invalidate() {
        let cache = ProductCache::new();
        assert!(cache.get(1).is_none());

        cache.insert(1, vec![product(1, "p-1")]);
        assert_eq!(cache.get(1).unwrap()[0].product_id, "p-1");

        cache.invalidate(1);
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn invalidate_is_scoped_to_one_system() {
        let cache = ProductCache::new();
        cache.insert(1, vec![product(1, "p-1")]);
        cache.insert(2, vec![product(2, "p-2")]);

        cache.invalidate(1);
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_some());
    }

    #[test]
    fn live_cache_distinguishes_empty_from_uncached() {
        let cache = LiveSystemCache::new();
        assert!(cache.get().is_none());

        cache.set(None);
        assert!(matches!(cache.get(), Some(None)));

        cache.invalidate();
        assert!(cache.get().is_none());
    }
}
