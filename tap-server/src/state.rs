//! Application state

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use shared::models::{Product, System};

use crate::auth::SessionStore;
use crate::bus::{BusConfig, NotificationBus};
use crate::cache::{LiveSystemCache, ProductCache};
use crate::config::Config;
use crate::db;
use crate::error::{AppError, AppResult};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Per-system product list cache
    pub products: Arc<ProductCache>,
    /// Cached live-system lookup
    pub live: Arc<LiveSystemCache>,
    /// Notification bus for order/data/message fan-out
    pub bus: NotificationBus,
    /// Opaque-token session store
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let bus = NotificationBus::from_config(BusConfig {
            order_window: Duration::from_millis(config.order_throttle_ms),
            data_window: Duration::from_millis(config.data_throttle_ms),
            ..BusConfig::default()
        });

        Ok(Self {
            pool,
            products: Arc::new(ProductCache::new()),
            live: Arc::new(LiveSystemCache::new()),
            bus,
            sessions: Arc::new(SessionStore::new(Duration::from_secs(
                config.session_ttl_secs,
            ))),
        })
    }

    /// The live system, through the cache.
    pub async fn live_system(&self) -> AppResult<Option<System>> {
        if let Some(cached) = self.live.get() {
            return Ok(cached);
        }
        let system = db::systems::find_live(&self.pool).await?;
        self.live.set(system.clone());
        Ok(system)
    }

    pub async fn require_live_system(&self) -> AppResult<System> {
        self.live_system()
            .await?
            .ok_or_else(|| AppError::not_found("No live system"))
    }

    /// A system's product catalog, through the cache. The cache is
    /// invalidated on every catalog save, so entries are as fresh as
    /// the last committed write.
    pub async fn catalog(&self, system_id: i64) -> AppResult<Arc<Vec<Product>>> {
        if let Some(products) = self.products.get(system_id) {
            return Ok(products);
        }
        let products = db::products::list_by_system(&self.pool, system_id).await?;
        Ok(self.products.insert(system_id, products))
    }
}
