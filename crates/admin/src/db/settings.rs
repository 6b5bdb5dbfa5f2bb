//! Per-shop stock settings.
//!
//! `get` never writes. Shops are provisioned explicitly with
//! `ensure_defaults` (CLI `settings init`, and the server at startup).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use stocksense_core::StockSettings;

use super::RepositoryError;
use crate::models::ShopSettings;

const SELECT_COLUMNS: &str = r"
    shop, stock_coverage_days, low_stock_threshold, medium_stock_threshold,
    reorder_point, email_notifications, updated_at
";

#[derive(Debug, sqlx::FromRow)]
struct ShopSettingsRow {
    shop: String,
    stock_coverage_days: i32,
    low_stock_threshold: i32,
    medium_stock_threshold: i32,
    reorder_point: Decimal,
    email_notifications: bool,
    updated_at: DateTime<Utc>,
}

impl From<ShopSettingsRow> for ShopSettings {
    fn from(row: ShopSettingsRow) -> Self {
        Self {
            shop: row.shop,
            settings: StockSettings {
                stock_coverage_days: row.stock_coverage_days,
                low_stock_threshold: row.low_stock_threshold,
                medium_stock_threshold: row.medium_stock_threshold,
                reorder_point: row.reorder_point,
                email_notifications: row.email_notifications,
            },
            updated_at: row.updated_at,
        }
    }
}

/// Repository for per-shop settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a shop's settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, shop: &str) -> Result<Option<ShopSettings>, RepositoryError> {
        let query =
            format!("SELECT {SELECT_COLUMNS} FROM stocksense.shop_settings WHERE shop = $1");
        let row = sqlx::query_as::<_, ShopSettingsRow>(&query)
            .bind(shop)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(ShopSettings::from))
    }

    /// A shop's settings, or the defaults if none are stored. Never writes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_default(&self, shop: &str) -> Result<StockSettings, RepositoryError> {
        Ok(self
            .get(shop)
            .await?
            .map(|stored| stored.settings)
            .unwrap_or_default())
    }

    /// Create the default settings row for a shop if it has none.
    ///
    /// Returns the stored settings and whether a row was created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn ensure_defaults(
        &self,
        shop: &str,
    ) -> Result<(ShopSettings, bool), RepositoryError> {
        let defaults = StockSettings::default();
        let inserted = sqlx::query(
            r"
            INSERT INTO stocksense.shop_settings (
                shop, stock_coverage_days, low_stock_threshold, medium_stock_threshold,
                reorder_point, email_notifications
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (shop) DO NOTHING
            ",
        )
        .bind(shop)
        .bind(defaults.stock_coverage_days)
        .bind(defaults.low_stock_threshold)
        .bind(defaults.medium_stock_threshold)
        .bind(defaults.reorder_point)
        .bind(defaults.email_notifications)
        .execute(self.pool)
        .await?
        .rows_affected()
            > 0;

        let stored = self.get(shop).await?.ok_or(RepositoryError::NotFound)?;
        if inserted {
            tracing::info!(shop, "Provisioned default stock settings");
        }
        Ok((stored, inserted))
    }

    /// Validate and save a shop's settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::SettingsValidation` with every violated
    /// constraint if the settings are invalid, `RepositoryError::Conflict` if
    /// a database check rejects them, or `RepositoryError::Database`.
    #[instrument(skip(self, settings))]
    pub async fn update(
        &self,
        shop: &str,
        settings: &StockSettings,
    ) -> Result<ShopSettings, RepositoryError> {
        settings
            .validate()
            .map_err(RepositoryError::SettingsValidation)?;

        let query = format!(
            r"
            INSERT INTO stocksense.shop_settings (
                shop, stock_coverage_days, low_stock_threshold, medium_stock_threshold,
                reorder_point, email_notifications
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (shop) DO UPDATE SET
                stock_coverage_days = EXCLUDED.stock_coverage_days,
                low_stock_threshold = EXCLUDED.low_stock_threshold,
                medium_stock_threshold = EXCLUDED.medium_stock_threshold,
                reorder_point = EXCLUDED.reorder_point,
                email_notifications = EXCLUDED.email_notifications,
                updated_at = NOW()
            RETURNING {SELECT_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, ShopSettingsRow>(&query)
            .bind(shop)
            .bind(settings.stock_coverage_days)
            .bind(settings.low_stock_threshold)
            .bind(settings.medium_stock_threshold)
            .bind(settings.reorder_point)
            .bind(settings.email_notifications)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_check_violation()
                {
                    return RepositoryError::Conflict(format!(
                        "settings rejected by database: {}",
                        db_err.message()
                    ));
                }
                RepositoryError::Database(e)
            })?;

        Ok(row.into())
    }
}
