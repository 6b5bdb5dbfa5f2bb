//! Status enums for stock health and purchase orders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse stock-health classification derived from days of stock.
///
/// Variants are ordered by urgency, so `Low < Medium < Good`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Fewer days of stock than the low threshold.
    Low,
    /// Between the low and medium thresholds.
    Medium,
    /// At or above the medium threshold, or no sales at all.
    Good,
}

impl StockStatus {
    /// All statuses, most urgent first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::Good];

    /// Lowercase identifier used in query strings and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Good => "good",
        }
    }

    /// Display label for the dashboard.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::Good => "Good",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "good" => Ok(Self::Good),
            _ => Err(format!("invalid stock status: {s}")),
        }
    }
}

/// Lifecycle of a purchase order.
///
/// ```text
/// Draft ──► Ordered ──► Received
///   │          │
///   └──────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "stocksense.purchase_order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    /// Editable draft, not yet sent to the supplier.
    Draft,
    /// Sent to the supplier, awaiting delivery.
    Ordered,
    /// Goods received.
    Received,
    /// Abandoned before receipt.
    Cancelled,
}

impl PurchaseOrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Draft, Self::Ordered, Self::Received, Self::Cancelled];

    /// Whether the order may move from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Ordered | Self::Cancelled)
                | (Self::Ordered, Self::Received | Self::Cancelled)
        )
    }

    /// Validate a transition, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseOrderError::InvalidTransition` if the move is not allowed.
    pub fn transition_to(self, next: Self) -> Result<Self, PurchaseOrderError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PurchaseOrderError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Statuses reachable from this one.
    #[must_use]
    pub fn next_statuses(&self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Received | Self::Cancelled)
    }

    /// Whether the order still counts as open on the dashboard.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Draft | Self::Ordered)
    }

    /// Only drafts may be edited or deleted.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Lowercase identifier used in forms and the database enum.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ordered => "ordered",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Ordered => "Ordered",
            Self::Received => "Received",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PurchaseOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "ordered" => Ok(Self::Ordered),
            "received" => Ok(Self::Received),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid purchase order status: {s}")),
        }
    }
}

/// Errors raised by purchase-order business rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseOrderError {
    /// Status change not permitted by the lifecycle.
    #[error("cannot move purchase order from {from} to {to}")]
    InvalidTransition {
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    },

    /// Order has no line items.
    #[error("purchase order has no line items")]
    Empty,

    /// A line item has a zero or negative quantity.
    #[error("line item {sku} has non-positive quantity {quantity}")]
    InvalidQuantity { sku: String, quantity: i64 },

    /// Order is no longer a draft.
    #[error("purchase order is {0} and can no longer be edited")]
    NotEditable(PurchaseOrderStatus),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_round_trips_through_str() {
        for status in StockStatus::ALL {
            assert_eq!(status.as_str().parse::<StockStatus>(), Ok(status));
        }
        assert!("critical".parse::<StockStatus>().is_err());
    }

    #[test]
    fn test_stock_status_orders_by_urgency() {
        assert!(StockStatus::Low < StockStatus::Medium);
        assert!(StockStatus::Medium < StockStatus::Good);
    }

    #[test]
    fn test_stock_status_serializes_lowercase() {
        let json = serde_json::to_string(&StockStatus::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_valid_purchase_order_transitions() {
        use PurchaseOrderStatus::{Cancelled, Draft, Ordered, Received};

        assert!(Draft.can_transition_to(Ordered));
        assert!(Draft.can_transition_to(Cancelled));
        assert!(Ordered.can_transition_to(Received));
        assert!(Ordered.can_transition_to(Cancelled));
    }

    #[test]
    fn test_invalid_purchase_order_transitions() {
        use PurchaseOrderStatus::{Cancelled, Draft, Ordered, Received};

        assert!(!Draft.can_transition_to(Received));
        assert!(!Draft.can_transition_to(Draft));
        assert!(!Ordered.can_transition_to(Draft));
        assert!(!Received.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Ordered));

        assert_eq!(
            Received.transition_to(Draft),
            Err(PurchaseOrderError::InvalidTransition {
                from: Received,
                to: Draft,
            })
        );
    }

    #[test]
    fn test_terminal_statuses_have_no_next_status() {
        for status in PurchaseOrderStatus::ALL {
            assert_eq!(status.is_terminal(), status.next_statuses().is_empty());
        }
        assert_eq!(
            PurchaseOrderStatus::Draft.next_statuses(),
            vec![PurchaseOrderStatus::Ordered, PurchaseOrderStatus::Cancelled]
        );
    }

    #[test]
    fn test_purchase_order_status_from_str() {
        for status in PurchaseOrderStatus::ALL {
            assert_eq!(status.as_str().parse::<PurchaseOrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<PurchaseOrderStatus>().is_err());
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = PurchaseOrderStatus::Cancelled
            .transition_to(PurchaseOrderStatus::Ordered)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot move purchase order from cancelled to ordered"
        );
    }
}
