//! Purchase order drafting from reorder suggestions.

use std::collections::BTreeMap;

use crate::models::{NewPurchaseOrder, NewPurchaseOrderItem};

use super::inventory::InventoryRow;

/// Supplier name used for SKUs whose product has no vendor.
pub const UNASSIGNED_VENDOR: &str = "Unassigned";

/// Which suggestions to turn into drafts.
#[derive(Debug, Clone, Default)]
pub struct ReorderSelection {
    /// Only SKUs from this vendor.
    pub vendor: Option<String>,
    /// Only these SKUs (empty means all).
    pub skus: Vec<String>,
}

impl ReorderSelection {
    fn includes(&self, row: &InventoryRow) -> bool {
        let vendor_ok = self
            .vendor
            .as_deref()
            .is_none_or(|v| vendor_name(row) == v);
        let sku_ok = self.skus.is_empty() || self.skus.iter().any(|s| *s == row.sku);
        vendor_ok && sku_ok
    }
}

fn vendor_name(row: &InventoryRow) -> &str {
    row.vendor.as_deref().unwrap_or(UNASSIGNED_VENDOR)
}

/// Group selected suggestions into one draft purchase order per vendor.
///
/// Rows with no suggestion are skipped. Unit cost is estimated from the
/// variant price. Vendors come back in name order.
#[must_use]
pub fn draft_purchase_orders(
    shop: &str,
    rows: &[InventoryRow],
    selection: &ReorderSelection,
) -> Vec<NewPurchaseOrder> {
    let mut by_vendor: BTreeMap<&str, Vec<NewPurchaseOrderItem>> = BTreeMap::new();

    for row in rows {
        if !row.health.needs_reorder() || !selection.includes(row) {
            continue;
        }
        let quantity = i32::try_from(row.health.suggested_quantity).unwrap_or(i32::MAX);
        by_vendor
            .entry(vendor_name(row))
            .or_default()
            .push(NewPurchaseOrderItem {
                sku: row.sku.clone(),
                title: row.title.clone(),
                quantity,
                unit_cost: row.price,
            });
    }

    by_vendor
        .into_iter()
        .map(|(vendor, items)| NewPurchaseOrder {
            shop: shop.to_string(),
            vendor: vendor.to_string(),
            notes: None,
            items,
        })
        .collect()
}
