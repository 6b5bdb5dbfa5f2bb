//! Shopify Admin API response types.
//!
//! Field names follow the GraphQL schema (camelCase on the wire). Only the
//! fields StockSense reads are modelled.

mod common;
mod inventory;
mod order;

pub use common::{Connection, PageInfo};
pub use inventory::{ProductRef, ProductStatus, VariantNode, VariantsData};
pub use order::{
    LineItemNode, OrderLineItemsData, OrderLineItemsNode, OrderNode, OrdersData, SoldLineItem,
};
