//! Sales velocity as an exact rational.
//!
//! Velocity is kept as `units_sold / window_days` rather than a float so the
//! ceiling steps in the reorder calculation never round a whole number up by
//! one because of binary floating-point error (`0.1 * 30` is not `3.0` in
//! `f64`).

use serde::{Deserialize, Serialize};

/// Trailing window, in days, over which order quantities are summed.
pub const DEFAULT_SALES_WINDOW_DAYS: u32 = 90;

/// Average units sold per day over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesVelocity {
    units_sold: u64,
    window_days: u32,
}

impl SalesVelocity {
    /// No sales at all.
    pub const ZERO: Self = Self {
        units_sold: 0,
        window_days: 1,
    };

    /// Velocity from units sold over a window of `window_days`.
    ///
    /// A zero-day window carries no demand signal and yields zero velocity.
    #[must_use]
    pub const fn new(units_sold: u64, window_days: u32) -> Self {
        if window_days == 0 {
            Self::ZERO
        } else {
            Self {
                units_sold,
                window_days,
            }
        }
    }

    /// Velocity of a whole number of units per day.
    #[must_use]
    pub const fn per_day(units: u64) -> Self {
        Self::new(units, 1)
    }

    /// Velocity over the standard 90-day window.
    #[must_use]
    pub const fn over_default_window(units_sold: u64) -> Self {
        Self::new(units_sold, DEFAULT_SALES_WINDOW_DAYS)
    }

    /// Units sold in the window.
    #[must_use]
    pub const fn units_sold(&self) -> u64 {
        self.units_sold
    }

    /// Window length in days.
    #[must_use]
    pub const fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Whether there is no demand signal.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.units_sold == 0
    }

    /// Approximate units per day, for display.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Display only
    pub fn as_f64(&self) -> f64 {
        self.units_sold as f64 / f64::from(self.window_days)
    }

    /// `ceil(velocity × days)` computed exactly.
    #[must_use]
    pub fn ceil_units_over(&self, days: u32) -> u64 {
        let numerator = u128::from(self.units_sold) * u128::from(days);
        let window = u128::from(self.window_days);
        let units = numerator.div_ceil(window);
        u64::try_from(units).unwrap_or(u64::MAX)
    }
}

impl Default for SalesVelocity {
    fn default() -> Self {
        Self::ZERO
    }
}
