//! GraphQL documents sent to the Admin API.
//!
//! Queries are plain strings wrapped in `graphql_client::QueryBody`; the
//! response shapes live in `shopify::types`.

use graphql_client::QueryBody;
use serde::Serialize;

/// Variants per page (Shopify maximum).
pub const VARIANTS_PAGE_SIZE: i64 = 250;

/// Orders per page.
pub const ORDERS_PAGE_SIZE: i64 = 100;

/// Product variants with stock, price and vendor.
pub const PRODUCT_VARIANTS_QUERY: &str = r"
query ProductVariants($first: Int!, $after: String) {
  productVariants(first: $first, after: $after) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      id
      sku
      title
      price
      inventoryQuantity
      product {
        id
        title
        vendor
        status
      }
    }
  }
}
";

/// Orders created since a date, with line-item SKUs and quantities.
pub const ORDERS_QUERY: &str = r"
query Orders($first: Int!, $after: String, $query: String) {
  orders(first: $first, after: $after, query: $query, sortKey: CREATED_AT) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      id
      createdAt
      lineItems(first: 100) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          sku
          quantity
        }
      }
    }
  }
}
";

/// Further line items of one order, for orders with more than fit in
/// [`ORDERS_QUERY`].
pub const ORDER_LINE_ITEMS_QUERY: &str = r"
query OrderLineItems($id: ID!, $first: Int!, $after: String) {
  order(id: $id) {
    lineItems(first: $first, after: $after) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        sku
        quantity
      }
    }
  }
}
";

/// Line items per page when paging a single order.
pub const LINE_ITEMS_PAGE_SIZE: i64 = 250;

/// Variables for [`PRODUCT_VARIANTS_QUERY`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantsVariables {
    pub first: i64,
    pub after: Option<String>,
}

/// Variables for [`ORDERS_QUERY`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersVariables {
    pub first: i64,
    pub after: Option<String>,
    pub query: Option<String>,
}

/// Variables for [`ORDER_LINE_ITEMS_QUERY`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItemsVariables {
    pub id: String,
    pub first: i64,
    pub after: Option<String>,
}

/// Build the request body for one page of variants.
#[must_use]
pub fn product_variants(after: Option<String>) -> QueryBody<ProductVariantsVariables> {
    QueryBody {
        variables: ProductVariantsVariables {
            first: VARIANTS_PAGE_SIZE,
            after,
        },
        query: PRODUCT_VARIANTS_QUERY,
        operation_name: "ProductVariants",
    }
}

/// Build the request body for one page of orders matching `search`.
#[must_use]
pub fn orders(search: String, after: Option<String>) -> QueryBody<OrdersVariables> {
    QueryBody {
        variables: OrdersVariables {
            first: ORDERS_PAGE_SIZE,
            after,
            query: Some(search),
        },
        query: ORDERS_QUERY,
        operation_name: "Orders",
    }
}

/// Build the request body for the line items of `order_id` after `after`.
#[must_use]
pub fn order_line_items(order_id: String, after: String) -> QueryBody<OrderLineItemsVariables> {
    QueryBody {
        variables: OrderLineItemsVariables {
            id: order_id,
            first: LINE_ITEMS_PAGE_SIZE,
            after: Some(after),
        },
        query: ORDER_LINE_ITEMS_QUERY,
        operation_name: "OrderLineItems",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_serialize_camel_case() {
        let body = orders("created_at:>=2026-07-21".to_string(), Some("abc".to_string()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "Orders");
        assert_eq!(json["variables"]["first"], 100);
        assert_eq!(json["variables"]["after"], "abc");
        assert_eq!(json["variables"]["query"], "created_at:>=2026-07-21");
    }

    #[test]
    fn test_first_page_has_null_cursor() {
        let body = product_variants(None);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["variables"]["first"], 250);
        assert!(json["variables"]["after"].is_null());
        assert!(json["query"].as_str().unwrap().contains("inventoryQuantity"));
    }

    #[test]
    fn test_order_line_items_variables() {
        let body = order_line_items("gid://shopify/Order/9".to_string(), "cur".to_string());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "OrderLineItems");
        assert_eq!(json["variables"]["id"], "gid://shopify/Order/9");
        assert_eq!(json["variables"]["first"], 250);
        assert_eq!(json["variables"]["after"], "cur");
    }
}
