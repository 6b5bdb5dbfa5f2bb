//! Sales fetching for velocity calculation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::instrument;

use super::{AdminClient, MAX_PAGES, queries};
use crate::shopify::{
    LineItemNode, OrderLineItemsData, OrdersData, ShopifyError, SoldLineItem,
};

/// Orders search filter for everything created on or after `since`.
#[must_use]
pub fn orders_search_query(since: DateTime<Utc>) -> String {
    format!("created_at:>={}", since.format("%Y-%m-%dT%H:%M:%SZ"))
}

/// Add sold quantities into the per-SKU totals.
fn record_sales(
    sales: &mut BTreeMap<String, u64>,
    items: impl IntoIterator<Item = SoldLineItem>,
) {
    for item in items {
        let total = sales.entry(item.sku).or_default();
        *total = total.saturating_add(item.quantity);
    }
}

impl AdminClient {
    /// Units sold per SKU across all orders created since `since`.
    ///
    /// Line items without a SKU or with a non-positive quantity are skipped.
    /// Orders whose line items do not fit in the order page are paged
    /// individually.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn fetch_sales_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<BTreeMap<String, u64>, ShopifyError> {
        let search = orders_search_query(since);
        let mut sales: BTreeMap<String, u64> = BTreeMap::new();
        let mut cursor: Option<String> = None;
        let mut order_count = 0_usize;
        let mut truncated_orders = 0_usize;

        for _ in 0..MAX_PAGES {
            let data: OrdersData = self
                .execute(&queries::orders(search.clone(), cursor))
                .await?;
            let connection = data.orders;

            for order in &connection.nodes {
                record_sales(&mut sales, order.sold_items());
                if let Some(after) = order.remaining_line_items_cursor() {
                    let complete = self
                        .fetch_remaining_line_items(&order.id, after.to_string(), &mut sales)
                        .await?;
                    if !complete {
                        truncated_orders += 1;
                    }
                }
            }
            order_count += connection.nodes.len();

            cursor = connection.next_cursor().map(str::to_string);
            if cursor.is_none() {
                if truncated_orders > 0 {
                    tracing::warn!(
                        orders = truncated_orders,
                        "Line-item pagination limit reached; sales undercounted"
                    );
                }
                tracing::debug!(orders = order_count, skus = sales.len(), "Fetched sales");
                return Ok(sales);
            }
        }

        tracing::warn!(
            max_pages = MAX_PAGES,
            orders = order_count,
            truncated_orders,
            "Order pagination limit reached; sales truncated"
        );
        Ok(sales)
    }

    /// Page through the rest of one order's line items, adding them to
    /// `sales`. Returns `false` if the page limit cut the order short.
    async fn fetch_remaining_line_items(
        &self,
        order_id: &str,
        after: String,
        sales: &mut BTreeMap<String, u64>,
    ) -> Result<bool, ShopifyError> {
        let mut cursor = after;

        for _ in 0..MAX_PAGES {
            let data: OrderLineItemsData = self
                .execute(&queries::order_line_items(order_id.to_string(), cursor))
                .await?;
            let Some(order) = data.order else {
                tracing::warn!(order = %order_id, "Order disappeared while paging line items");
                return Ok(true);
            };
            let line_items = order.line_items;
            record_sales(sales, line_items.nodes.iter().filter_map(LineItemNode::sold));

            match line_items.next_cursor() {
                Some(next) => cursor = next.to_string(),
                None => return Ok(true),
            }
        }

        tracing::warn!(order = %order_id, max_pages = MAX_PAGES, "Order line items truncated");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_orders_search_query() {
        let since = Utc.with_ymd_and_hms(2026, 7, 21, 8, 30, 0).single();
        let query = since.map(orders_search_query);
        assert_eq!(query.as_deref(), Some("created_at:>=2026-07-21T08:30:00Z"));
    }

    #[test]
    fn test_record_sales_sums_across_pages() {
        let mut sales = BTreeMap::new();
        let sold = |sku: &str, quantity| SoldLineItem {
            sku: sku.to_string(),
            quantity,
        };

        record_sales(&mut sales, vec![sold("TEE", 2), sold("MUG", 1)]);
        record_sales(&mut sales, vec![sold("TEE", 3)]);
        record_sales(&mut sales, vec![sold("MUG", u64::MAX)]);

        assert_eq!(sales.get("TEE"), Some(&5));
        assert_eq!(sales.get("MUG"), Some(&u64::MAX));
    }
}
