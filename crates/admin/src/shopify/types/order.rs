//! Order line-item types for sales velocity.

use serde::{Deserialize, Serialize};

use super::common::Connection;

/// A line item within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemNode {
    /// SKU at time of purchase.
    #[serde(default)]
    pub sku: Option<String>,
    /// Units ordered.
    pub quantity: i64,
}

/// An order with its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNode {
    /// Order ID.
    pub id: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// First page of line items; see [`OrderNode::remaining_line_items_cursor`].
    pub line_items: Connection<LineItemNode>,
}

/// Response data for the orders query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersData {
    pub orders: Connection<OrderNode>,
}

/// Response data for one further page of an order's line items.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItemsData {
    /// `None` if the order was deleted between requests.
    pub order: Option<OrderLineItemsNode>,
}

/// The line-item connection of a single order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItemsNode {
    pub line_items: Connection<LineItemNode>,
}

/// A sold quantity attributed to a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoldLineItem {
    /// Trimmed SKU.
    pub sku: String,
    /// Units sold.
    pub quantity: u64,
}

impl LineItemNode {
    /// The sale this line records, if it has a SKU and a positive quantity.
    #[must_use]
    pub fn sold(&self) -> Option<SoldLineItem> {
        let sku = self.sku.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let quantity = u64::try_from(self.quantity).ok().filter(|q| *q > 0)?;
        Some(SoldLineItem {
            sku: sku.to_string(),
            quantity,
        })
    }
}

impl OrderNode {
    /// Line items in the first page with a SKU and a positive quantity.
    pub fn sold_items(&self) -> impl Iterator<Item = SoldLineItem> + '_ {
        self.line_items.nodes.iter().filter_map(LineItemNode::sold)
    }

    /// Cursor for the line items not included in the order page.
    #[must_use]
    pub fn remaining_line_items_cursor(&self) -> Option<&str> {
        self.line_items.next_cursor()
    }
}
