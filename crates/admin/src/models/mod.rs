//! Domain models for StockSense.
//!
//! Persisted records only. Stock metrics are computed on the fly by
//! `stocksense_core` and never stored.

pub mod purchase_order;
pub mod settings;

pub use purchase_order::{
    NewPurchaseOrder, NewPurchaseOrderItem, PurchaseOrder, PurchaseOrderFilter, PurchaseOrderItem,
    PurchaseOrderSummary, PurchaseOrderWithItems,
};
pub use settings::ShopSettings;
