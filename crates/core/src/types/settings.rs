//! Per-shop stock settings.
//!
//! Settings are validated here, at the configuration boundary. The stock
//! calculator assumes it is handed settings that passed [`StockSettings::validate`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed range for `stock_coverage_days`.
pub const COVERAGE_DAYS_RANGE: std::ops::RangeInclusive<i32> = 1..=365;

/// A single violated settings constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("stock coverage must be between 1 and 365 days (got {0})")]
    CoverageOutOfRange(i32),

    #[error("low stock threshold must be at least 1 day (got {0})")]
    LowThresholdNotPositive(i32),

    #[error("low stock threshold ({low}) must be less than medium stock threshold ({medium})")]
    ThresholdsInverted { low: i32, medium: i32 },

    #[error("reorder point must be between 0 and 1 (got {0})")]
    ReorderPointOutOfRange(Decimal),
}

/// Stock health configuration for one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSettings {
    /// Target days of inventory to hold.
    pub stock_coverage_days: i32,
    /// Days of stock below which a SKU is "low".
    pub low_stock_threshold: i32,
    /// Days of stock below which a SKU is "medium".
    pub medium_stock_threshold: i32,
    /// Safety-buffer fraction applied to suggested quantities.
    pub reorder_point: Decimal,
    /// Whether the merchant wants stock alert emails.
    pub email_notifications: bool,
}

impl Default for StockSettings {
    fn default() -> Self {
        Self {
            stock_coverage_days: 30,
            low_stock_threshold: 7,
            medium_stock_threshold: 14,
            reorder_point: Decimal::new(1, 1),
            email_notifications: true,
        }
    }
}

impl StockSettings {
    /// Check every constraint and return all violations.
    ///
    /// # Errors
    ///
    /// Returns the list of violated constraints, in field order.
    pub fn validate(&self) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        if !COVERAGE_DAYS_RANGE.contains(&self.stock_coverage_days) {
            errors.push(SettingsError::CoverageOutOfRange(self.stock_coverage_days));
        }
        if self.low_stock_threshold < 1 {
            errors.push(SettingsError::LowThresholdNotPositive(
                self.low_stock_threshold,
            ));
        }
        if self.low_stock_threshold >= self.medium_stock_threshold {
            errors.push(SettingsError::ThresholdsInverted {
                low: self.low_stock_threshold,
                medium: self.medium_stock_threshold,
            });
        }
        if self.reorder_point < Decimal::ZERO || self.reorder_point > Decimal::ONE {
            errors.push(SettingsError::ReorderPointOutOfRange(self.reorder_point));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Coverage days as an unsigned count (negative values clamp to zero).
    #[must_use]
    pub fn coverage_days(&self) -> u32 {
        u32::try_from(self.stock_coverage_days).unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = StockSettings::default();
        assert_eq!(settings.stock_coverage_days, 30);
        assert_eq!(settings.low_stock_threshold, 7);
        assert_eq!(settings.medium_stock_threshold, 14);
        assert_eq!(settings.reorder_point.to_string(), "0.1");
        assert!(settings.email_notifications);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let settings = StockSettings {
            low_stock_threshold: 14,
            medium_stock_threshold: 7,
            ..StockSettings::default()
        };
        assert_eq!(
            settings.validate().unwrap_err(),
            vec![SettingsError::ThresholdsInverted { low: 14, medium: 7 }]
        );
    }

    #[test]
    fn test_equal_thresholds_rejected() {
        let settings = StockSettings {
            low_stock_threshold: 10,
            medium_stock_threshold: 10,
            ..StockSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_coverage_bounds() {
        for days in [1, 365] {
            let settings = StockSettings {
                stock_coverage_days: days,
                ..StockSettings::default()
            };
            assert!(settings.validate().is_ok(), "{days} should be accepted");
        }
        for days in [0, 366, -5] {
            let settings = StockSettings {
                stock_coverage_days: days,
                ..StockSettings::default()
            };
            assert_eq!(
                settings.validate().unwrap_err(),
                vec![SettingsError::CoverageOutOfRange(days)]
            );
        }
    }

    #[test]
    fn test_reorder_point_bounds() {
        for rp in [Decimal::ZERO, Decimal::ONE, Decimal::new(25, 2)] {
            let settings = StockSettings {
                reorder_point: rp,
                ..StockSettings::default()
            };
            assert!(settings.validate().is_ok());
        }
        let settings = StockSettings {
            reorder_point: Decimal::new(15, 1),
            ..StockSettings::default()
        };
        assert_eq!(
            settings.validate().unwrap_err(),
            vec![SettingsError::ReorderPointOutOfRange(Decimal::new(15, 1))]
        );
    }

    #[test]
    fn test_all_violations_reported() {
        let settings = StockSettings {
            stock_coverage_days: 0,
            low_stock_threshold: 0,
            medium_stock_threshold: 0,
            reorder_point: Decimal::NEGATIVE_ONE,
            email_notifications: false,
        };
        assert_eq!(settings.validate().unwrap_err().len(), 4);
    }

    #[test]
    fn test_error_messages() {
        let err = SettingsError::ThresholdsInverted { low: 20, medium: 10 };
        assert_eq!(
            err.to_string(),
            "low stock threshold (20) must be less than medium stock threshold (10)"
        );
    }
}
