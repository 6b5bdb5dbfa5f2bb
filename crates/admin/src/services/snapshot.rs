//! Cached inventory snapshots.
//!
//! Fetching every variant and 90 days of orders costs several paginated
//! Admin API calls, so the raw snapshot is cached per shop with `moka`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use tracing::{debug, instrument};

use super::inventory::{InventorySnapshot, aggregate_variants};
use crate::shopify::{AdminClient, ShopifyError};

/// Fetches and caches inventory snapshots for the configured shop.
#[derive(Clone)]
pub struct InventoryService {
    shopify: AdminClient,
    cache: Cache<String, Arc<InventorySnapshot>>,
    window_days: u32,
}

impl InventoryService {
    /// Create a service with the given sales window and cache lifetime.
    #[must_use]
    pub fn new(shopify: AdminClient, window_days: u32, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(ttl)
            .build();

        Self {
            shopify,
            cache,
            window_days,
        }
    }

    /// Shop domain this service reads from.
    #[must_use]
    pub fn shop(&self) -> &str {
        self.shopify.store()
    }

    /// Current snapshot, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if either Shopify fetch fails. Failures are not cached.
    #[instrument(skip(self), fields(shop = %self.shop()))]
    pub async fn snapshot(&self) -> Result<Arc<InventorySnapshot>, ShopifyError> {
        let key = self.shop().to_string();

        if let Some(snapshot) = self.cache.get(&key).await {
            debug!("Cache hit for inventory snapshot");
            return Ok(snapshot);
        }

        let since = Utc::now() - chrono::Duration::days(i64::from(self.window_days));
        let (variants, sales) = tokio::join!(
            self.shopify.fetch_variants(),
            self.shopify.fetch_sales_since(since)
        );

        let snapshot = Arc::new(InventorySnapshot::new(
            aggregate_variants(variants?),
            sales?,
            self.window_days,
            Utc::now(),
        ));
        tracing::info!(
            skus = snapshot.skus().len(),
            window_days = self.window_days,
            "Fetched inventory snapshot"
        );

        self.cache.insert(key, Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    /// Drop the cached snapshot so the next request refetches.
    pub async fn invalidate(&self) {
        self.cache.invalidate(self.shop()).await;
    }
}
