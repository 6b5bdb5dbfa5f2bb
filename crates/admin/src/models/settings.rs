//! Persisted per-shop settings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stocksense_core::StockSettings;

/// Stock settings stored for one shop.
#[derive(Debug, Clone, Serialize)]
pub struct ShopSettings {
    /// Shop domain.
    pub shop: String,
    /// The settings themselves.
    pub settings: StockSettings,
    /// When the settings were last saved.
    pub updated_at: DateTime<Utc>,
}
