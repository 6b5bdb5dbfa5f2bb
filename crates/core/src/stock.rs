//! Stock health calculator.
//!
//! Two pure functions drive every stock metric in StockSense:
//!
//! - [`classify_stock_status`] buckets a SKU into low / medium / good by
//!   comparing its days of stock against the shop's thresholds.
//! - [`suggested_reorder_quantity`] computes how many units to order to reach
//!   the shop's coverage target, padded by the reorder-point safety buffer.
//!
//! Both round up wherever a fraction appears, so a suggestion never
//! under-orders. Neither performs I/O or keeps state.
//!
//! Settings are assumed valid (`low_stock_threshold < medium_stock_threshold`).
//! With inverted thresholds the medium band is empty and every SKU is either
//! low or good; settings are rejected before they get that far.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::types::{SalesVelocity, StockSettings, StockStatus};

/// Estimated days until stockout at the current sales pace.
///
/// Returns `None` when velocity is zero (infinite coverage).
#[must_use]
#[allow(clippy::cast_precision_loss)] // Display value only
pub fn days_of_stock(current_stock: i64, velocity: SalesVelocity) -> Option<f64> {
    if velocity.is_zero() {
        return None;
    }
    let stock_days = current_stock as f64 * f64::from(velocity.window_days());
    Some(stock_days / velocity.units_sold() as f64)
}

/// Classify stock health for one SKU.
///
/// `days < low` is low, `low <= days < medium` is medium, anything else
/// (including zero velocity) is good. Comparisons are done on integers
/// (`stock × window` against `threshold × units`) so boundaries are exact.
#[must_use]
pub fn classify_stock_status(
    current_stock: i64,
    velocity: SalesVelocity,
    settings: &StockSettings,
) -> StockStatus {
    if velocity.is_zero() {
        return StockStatus::Good;
    }

    let stock_days = i128::from(current_stock) * i128::from(velocity.window_days());
    let units = i128::from(velocity.units_sold());

    if stock_days < i128::from(settings.low_stock_threshold) * units {
        StockStatus::Low
    } else if stock_days < i128::from(settings.medium_stock_threshold) * units {
        StockStatus::Medium
    } else {
        StockStatus::Good
    }
}

/// Suggested number of units to reorder.
///
/// 1. No sales means no suggestion.
/// 2. `target = ceil(velocity × coverage_days)`
/// 3. `raw = max(0, target - stock)`
/// 4. `ceil(raw × (1 + reorder_point))`
#[must_use]
pub fn suggested_reorder_quantity(
    current_stock: i64,
    velocity: SalesVelocity,
    settings: &StockSettings,
) -> u64 {
    if velocity.is_zero() {
        return 0;
    }

    let target = velocity.ceil_units_over(settings.coverage_days());
    let shortfall = (i128::from(target) - i128::from(current_stock)).max(0);
    let raw = u64::try_from(shortfall).unwrap_or(u64::MAX);
    if raw == 0 {
        return 0;
    }

    let multiplier = (Decimal::ONE + settings.reorder_point).max(Decimal::ZERO);
    Decimal::from(raw)
        .checked_mul(multiplier)
        .map_or(u64::MAX, |buffered| buffered.ceil().to_u64().unwrap_or(u64::MAX))
}

/// Every stock metric for one SKU.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StockHealth {
    /// Low / medium / good classification.
    pub status: StockStatus,
    /// Days of stock remaining, `None` when nothing is selling.
    pub days_of_stock: Option<f64>,
    /// Units to reorder.
    pub suggested_quantity: u64,
}

impl StockHealth {
    /// Whether a reorder is suggested.
    #[must_use]
    pub const fn needs_reorder(&self) -> bool {
        self.suggested_quantity > 0
    }
}

/// Compute status, days of stock and suggested quantity in one call.
#[must_use]
pub fn evaluate(
    current_stock: i64,
    velocity: SalesVelocity,
    settings: &StockSettings,
) -> StockHealth {
    StockHealth {
        status: classify_stock_status(current_stock, velocity, settings),
        days_of_stock: days_of_stock(current_stock, velocity),
        suggested_quantity: suggested_reorder_quantity(current_stock, velocity, settings),
    }
}
