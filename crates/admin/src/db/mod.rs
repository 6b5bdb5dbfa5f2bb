//! Database operations for StockSense `PostgreSQL`.
//!
//! ## Tables (schema `stocksense`)
//!
//! - `shop_settings` - Per-shop stock settings
//! - `purchase_orders` - Purchase orders raised with suppliers
//! - `purchase_order_items` - Line items on purchase orders
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p stocksense-cli -- migrate
//! ```

pub mod purchase_orders;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use stocksense_core::{PurchaseOrderError, SettingsError};

pub use purchase_orders::PurchaseOrderRepository;
pub use settings::SettingsRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Settings failed validation; nothing was written.
    #[error("invalid settings: {}", format_settings_errors(.0))]
    SettingsValidation(Vec<SettingsError>),

    /// Purchase order business rule violated; nothing was written.
    #[error(transparent)]
    PurchaseOrder(#[from] PurchaseOrderError),
}

fn format_settings_errors(errors: &[SettingsError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_validation_message_lists_every_error() {
        let err = RepositoryError::SettingsValidation(vec![
            SettingsError::CoverageOutOfRange(0),
            SettingsError::ThresholdsInverted { low: 14, medium: 7 },
        ]);
        assert_eq!(
            err.to_string(),
            "invalid settings: stock coverage must be between 1 and 365 days (got 0); \
             low stock threshold (14) must be less than medium stock threshold (7)"
        );
    }

    #[test]
    fn test_purchase_order_error_is_transparent() {
        let err = RepositoryError::from(PurchaseOrderError::Empty);
        assert_eq!(err.to_string(), "purchase order has no line items");
    }
}
