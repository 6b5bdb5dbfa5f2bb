//! CLI subcommands.

pub mod migrate;
pub mod settings;

use secrecy::ExposeSecret;
use sqlx::PgPool;

use stocksense_admin::config::{ConfigError, get_database_url};

/// Connect to the StockSense database named by `STOCKSENSE_DATABASE_URL`
/// (or `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();

    let database_url = get_database_url("STOCKSENSE_DATABASE_URL")?;

    tracing::info!("Connecting to StockSense database...");
    Ok(PgPool::connect(database_url.expose_secret()).await?)
}

/// Errors that can occur while connecting.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}
