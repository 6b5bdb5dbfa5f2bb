//! Business logic services for StockSense.
//!
//! # Services
//!
//! - `inventory` - SKU aggregation, stock health rows and dashboard summary
//! - `snapshot` - Cached Shopify inventory snapshots
//! - `reorder` - Drafting purchase orders from reorder suggestions

pub mod inventory;
pub mod reorder;
pub mod snapshot;

pub use inventory::{
    DashboardSummary, InventoryQuery, InventoryRow, InventorySnapshot, InventorySort, SkuMap,
    SkuRecord, aggregate_variants,
};
pub use reorder::{ReorderSelection, UNASSIGNED_VENDOR, draft_purchase_orders};
pub use snapshot::InventoryService;
