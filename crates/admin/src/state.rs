//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StockSenseConfig;
use crate::services::InventoryService;
use crate::shopify::AdminClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StockSenseConfig,
    pool: PgPool,
    inventory: InventoryService,
}

impl AppState {
    /// Build state from configuration and a database pool.
    #[must_use]
    pub fn new(config: StockSenseConfig, pool: PgPool) -> Self {
        let shopify = AdminClient::new(&config.shopify);
        let inventory = InventoryService::new(shopify, config.sales_window_days, config.cache_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                inventory,
            }),
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Cached Shopify inventory.
    #[must_use]
    pub fn inventory(&self) -> &InventoryService {
        &self.inner.inventory
    }

    /// Shop domain this instance serves.
    #[must_use]
    pub fn shop(&self) -> &str {
        self.inner.config.shop()
    }
}
