//! Per-shop settings commands.
//!
//! # Usage
//!
//! ```bash
//! ss-cli settings init --shop my-store.myshopify.com
//! ss-cli settings show --shop my-store.myshopify.com
//! ss-cli settings set --shop my-store.myshopify.com --low-threshold 5 --medium-threshold 10
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use stocksense_admin::config::normalize_shop_domain;
use stocksense_admin::db::{RepositoryError, SettingsRepository};
use stocksense_admin::models::ShopSettings;
use stocksense_core::StockSettings;

use super::{ConnectError, connect};

/// Errors that can occur during settings operations.
#[derive(Debug, Error)]
pub enum SettingsCommandError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Shop domain is empty or malformed.
    #[error("Invalid shop domain: {0:?}")]
    InvalidShop(String),

    /// No settings stored for the shop.
    #[error("No settings stored for {0}; run `ss-cli settings init --shop {0}` first")]
    NotProvisioned(String),
}

/// Fields to change with `settings set`; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SettingsChanges {
    pub stock_coverage_days: Option<i32>,
    pub low_stock_threshold: Option<i32>,
    pub medium_stock_threshold: Option<i32>,
    pub reorder_point: Option<Decimal>,
    pub email_notifications: Option<bool>,
}

impl SettingsChanges {
    /// Apply the changes on top of `current`.
    #[must_use]
    pub fn apply(&self, current: &StockSettings) -> StockSettings {
        StockSettings {
            stock_coverage_days: self
                .stock_coverage_days
                .unwrap_or(current.stock_coverage_days),
            low_stock_threshold: self
                .low_stock_threshold
                .unwrap_or(current.low_stock_threshold),
            medium_stock_threshold: self
                .medium_stock_threshold
                .unwrap_or(current.medium_stock_threshold),
            reorder_point: self.reorder_point.unwrap_or(current.reorder_point),
            email_notifications: self
                .email_notifications
                .unwrap_or(current.email_notifications),
        }
    }

    /// Whether any field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stock_coverage_days.is_none()
            && self.low_stock_threshold.is_none()
            && self.medium_stock_threshold.is_none()
            && self.reorder_point.is_none()
            && self.email_notifications.is_none()
    }
}

/// Reduce a shop domain to the key the dashboard uses.
///
/// # Errors
///
/// Returns `SettingsCommandError::InvalidShop` if nothing usable remains.
pub fn normalize_shop(raw: &str) -> Result<String, SettingsCommandError> {
    normalize_shop_domain(raw).ok_or_else(|| SettingsCommandError::InvalidShop(raw.to_string()))
}

fn log_settings(stored: &ShopSettings) {
    let s = &stored.settings;
    tracing::info!(
        shop = %stored.shop,
        stock_coverage_days = s.stock_coverage_days,
        low_stock_threshold = s.low_stock_threshold,
        medium_stock_threshold = s.medium_stock_threshold,
        reorder_point = %s.reorder_point,
        email_notifications = s.email_notifications,
        updated_at = %stored.updated_at,
        "Stock settings"
    );
}

/// Store default settings for a shop if it has none.
///
/// # Errors
///
/// Returns an error if the shop is invalid or the database fails.
pub async fn init(shop: &str) -> Result<(), SettingsCommandError> {
    let shop = normalize_shop(shop)?;
    let pool = connect().await?;

    let (stored, created) = SettingsRepository::new(&pool).ensure_defaults(&shop).await?;
    if created {
        tracing::info!(shop = %shop, "Default settings created");
    } else {
        tracing::info!(shop = %shop, "Settings already exist; left unchanged");
    }
    log_settings(&stored);
    Ok(())
}

/// Show a shop's stored settings.
///
/// # Errors
///
/// Returns `NotProvisioned` if the shop has no stored settings.
pub async fn show(shop: &str) -> Result<(), SettingsCommandError> {
    let shop = normalize_shop(shop)?;
    let pool = connect().await?;

    let stored = SettingsRepository::new(&pool)
        .get(&shop)
        .await?
        .ok_or_else(|| SettingsCommandError::NotProvisioned(shop.clone()))?;
    log_settings(&stored);
    Ok(())
}

/// Change stored settings; the result is validated before it is written.
///
/// # Errors
///
/// Returns `NotProvisioned` if the shop has no stored settings, or a
/// repository error listing every violated constraint.
pub async fn set(shop: &str, changes: &SettingsChanges) -> Result<(), SettingsCommandError> {
    let shop = normalize_shop(shop)?;
    if changes.is_empty() {
        tracing::warn!("No settings given; nothing to change");
        return Ok(());
    }
    let pool = connect().await?;
    let repo = SettingsRepository::new(&pool);

    let current = repo
        .get(&shop)
        .await?
        .ok_or_else(|| SettingsCommandError::NotProvisioned(shop.clone()))?;
    let updated = repo.update(&shop, &changes.apply(&current.settings)).await?;

    tracing::info!(shop = %shop, "Settings updated");
    log_settings(&updated);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_shop() {
        assert_eq!(
            normalize_shop(" https://My-Store.myshopify.com/ ").unwrap(),
            "my-store.myshopify.com"
        );
        assert_eq!(
            normalize_shop("demo.myshopify.com").unwrap(),
            "demo.myshopify.com"
        );
    }

    #[test]
    fn test_shop_key_matches_dashboard_client() {
        use secrecy::SecretString;
        use stocksense_admin::config::ShopifyAdminConfig;
        use stocksense_admin::shopify::AdminClient;

        let raw = "My-Store.myshopify.com";
        let client = AdminClient::new(&ShopifyAdminConfig {
            store: normalize_shop_domain(raw).unwrap(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from("shpat_test"),
        });
        assert_eq!(normalize_shop(raw).unwrap(), client.store());
    }

    #[test]
    fn test_normalize_shop_rejects_garbage() {
        for raw in ["", "   ", "https://", "localhost", "demo.myshopify.com/admin"] {
            assert!(normalize_shop(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_changes_apply_over_current() {
        let changes = SettingsChanges {
            low_stock_threshold: Some(3),
            email_notifications: Some(false),
            ..SettingsChanges::default()
        };
        let updated = changes.apply(&StockSettings::default());
        assert_eq!(updated.low_stock_threshold, 3);
        assert_eq!(updated.medium_stock_threshold, 14);
        assert!(!updated.email_notifications);
        assert!(!changes.is_empty());
        assert!(SettingsChanges::default().is_empty());
    }
}
