//! Purchase order domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stocksense_core::{
    PurchaseOrderError, PurchaseOrderId, PurchaseOrderItemId, PurchaseOrderStatus,
};

/// A purchase order raised with a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Unique purchase order ID.
    pub id: PurchaseOrderId,
    /// Shop domain the order belongs to.
    pub shop: String,
    /// Supplier name (the product vendor).
    pub vendor: String,
    /// Lifecycle status.
    pub status: PurchaseOrderStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the order was drafted.
    pub created_at: DateTime<Utc>,
    /// When the order was last changed.
    pub updated_at: DateTime<Utc>,
    /// When the order was sent to the supplier.
    pub ordered_at: Option<DateTime<Utc>>,
    /// When the goods arrived.
    pub received_at: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    /// Human-facing order number.
    #[must_use]
    pub fn number(&self) -> String {
        self.id.po_number()
    }
}

/// A line on a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    /// Unique line ID.
    pub id: PurchaseOrderItemId,
    /// Parent order.
    pub purchase_order_id: PurchaseOrderId,
    /// SKU ordered.
    pub sku: String,
    /// Product title at time of ordering.
    pub title: String,
    /// Units ordered.
    pub quantity: i32,
    /// Estimated cost per unit.
    pub unit_cost: Decimal,
}

impl PurchaseOrderItem {
    /// `quantity × unit_cost`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_cost
    }
}

/// A purchase order with its line items and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderWithItems {
    pub order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
}

impl PurchaseOrderWithItems {
    /// Total units across all lines.
    #[must_use]
    pub fn total_units(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }

    /// Total estimated cost across all lines.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.items.iter().map(PurchaseOrderItem::line_total).sum()
    }
}

/// A purchase order row for list pages, with aggregated totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderSummary {
    pub order: PurchaseOrder,
    /// Number of lines.
    pub item_count: i64,
    /// Total units.
    pub total_units: i64,
    /// Total estimated cost.
    pub total_cost: Decimal,
}

/// Input for a line on a new purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchaseOrderItem {
    pub sku: String,
    pub title: String,
    pub quantity: i32,
    pub unit_cost: Decimal,
}

/// Input for creating a draft purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchaseOrder {
    pub shop: String,
    pub vendor: String,
    pub notes: Option<String>,
    pub items: Vec<NewPurchaseOrderItem>,
}

impl NewPurchaseOrder {
    /// Check the order has lines and every line a positive quantity.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), PurchaseOrderError> {
        if self.items.is_empty() {
            return Err(PurchaseOrderError::Empty);
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity <= 0) {
            return Err(PurchaseOrderError::InvalidQuantity {
                sku: item.sku.clone(),
                quantity: i64::from(item.quantity),
            });
        }
        Ok(())
    }

    /// Total estimated cost.
    #[must_use]
    pub fn total_cost(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| Decimal::from(i.quantity) * i.unit_cost)
            .sum()
    }
}

/// Filter for listing purchase orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurchaseOrderFilter {
    /// Only orders in this status.
    pub status: Option<PurchaseOrderStatus>,
    /// Maximum rows returned.
    pub limit: Option<i64>,
}
