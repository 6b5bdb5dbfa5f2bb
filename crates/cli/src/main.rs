//! StockSense CLI - Database migrations and settings provisioning.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ss-cli migrate
//!
//! # Create default settings for a shop (no-op if they exist)
//! ss-cli settings init --shop my-store.myshopify.com
//!
//! # Print a shop's settings
//! ss-cli settings show --shop my-store.myshopify.com
//!
//! # Change individual settings
//! ss-cli settings set --shop my-store.myshopify.com --coverage-days 45
//! ```
//!
//! `--shop` defaults to `SHOPIFY_STORE`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "ss-cli")]
#[command(author, version, about = "StockSense CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage per-shop stock settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Store default settings for a shop if it has none
    Init {
        /// Shop domain (e.g. my-store.myshopify.com)
        #[arg(short, long, env = "SHOPIFY_STORE")]
        shop: String,
    },
    /// Show a shop's stored settings
    Show {
        /// Shop domain (e.g. my-store.myshopify.com)
        #[arg(short, long, env = "SHOPIFY_STORE")]
        shop: String,
    },
    /// Change one or more settings
    Set {
        /// Shop domain (e.g. my-store.myshopify.com)
        #[arg(short, long, env = "SHOPIFY_STORE")]
        shop: String,

        /// Target days of inventory to hold (1-365)
        #[arg(long)]
        coverage_days: Option<i32>,

        /// Days of stock below which a SKU is low
        #[arg(long)]
        low_threshold: Option<i32>,

        /// Days of stock below which a SKU is medium
        #[arg(long)]
        medium_threshold: Option<i32>,

        /// Safety buffer fraction (0-1)
        #[arg(long)]
        reorder_point: Option<Decimal>,

        /// Stock alert emails on or off
        #[arg(long)]
        email_notifications: Option<bool>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Settings { action } => match action {
            SettingsAction::Init { shop } => commands::settings::init(&shop).await?,
            SettingsAction::Show { shop } => commands::settings::show(&shop).await?,
            SettingsAction::Set {
                shop,
                coverage_days,
                low_threshold,
                medium_threshold,
                reorder_point,
                email_notifications,
            } => {
                let changes = commands::settings::SettingsChanges {
                    stock_coverage_days: coverage_days,
                    low_stock_threshold: low_threshold,
                    medium_stock_threshold: medium_threshold,
                    reorder_point,
                    email_notifications,
                };
                commands::settings::set(&shop, &changes).await?;
            }
        },
    }
    Ok(())
}
