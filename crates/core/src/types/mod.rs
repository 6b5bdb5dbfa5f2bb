//! Core types for StockSense.
//!
//! This module provides type-safe wrappers for the inventory domain.

pub mod id;
pub mod settings;
pub mod status;
pub mod velocity;

pub use id::*;
pub use settings::{SettingsError, StockSettings};
pub use status::*;
pub use velocity::{DEFAULT_SALES_WINDOW_DAYS, SalesVelocity};
