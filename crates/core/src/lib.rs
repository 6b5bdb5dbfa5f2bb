//! StockSense Core - stock health calculator and shared domain types.
//!
//! This crate is used by every StockSense component:
//! - `admin` - Merchant-facing inventory dashboard
//! - `cli` - Migrations and settings provisioning
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Everything here is deterministic and safe to call
//! from any number of request handlers concurrently.
//!
//! # Modules
//!
//! - [`stock`] - Stock status classification and reorder suggestions
//! - [`types`] - IDs, statuses, per-shop settings and sales velocity

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod stock;
pub mod types;

pub use stock::{
    StockHealth, classify_stock_status, days_of_stock, evaluate, suggested_reorder_quantity,
};
pub use types::*;
