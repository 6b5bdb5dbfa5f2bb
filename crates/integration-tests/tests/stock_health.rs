//! End-to-end stock health flow: Shopify variants and sales in, dashboard
//! summary and draft purchase orders out.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;

use stocksense_admin::services::{
    DashboardSummary, InventoryQuery, InventorySnapshot, InventorySort, ReorderSelection,
    UNASSIGNED_VENDOR, aggregate_variants, draft_purchase_orders,
};
use stocksense_admin::shopify::VariantNode;
use stocksense_core::{StockSettings, StockStatus};
use stocksense_integration_tests::TEST_SHOP;

fn variant(
    id: u32,
    sku: Option<&str>,
    product: &str,
    variant_title: &str,
    stock: i64,
    price: &str,
    vendor: Option<&str>,
) -> VariantNode {
    serde_json::from_value(json!({
        "id": format!("gid://shopify/ProductVariant/{id}"),
        "sku": sku,
        "title": variant_title,
        "price": price,
        "inventoryQuantity": stock,
        "product": {
            "id": format!("gid://shopify/Product/{id}"),
            "title": product,
            "vendor": vendor,
            "status": "ACTIVE"
        }
    }))
    .unwrap()
}

/// Four SKUs over a 90-day window:
///
/// - `TEE-S`: 10 in stock, 180 sold (2/day) -> 5 days, low
/// - `MUG`: 10 in stock split over two variants, 90 sold (1/day) -> 10 days, medium
/// - `CAP`: 100 in stock, 90 sold -> 100 days, good
/// - `PIN`: 4 in stock, nothing sold -> good, no suggestion
fn snapshot() -> InventorySnapshot {
    let variants = vec![
        variant(1, Some("TEE-S"), "Tee", "Small", 10, "20.00", Some("Acme")),
        variant(2, Some("MUG"), "Mug", "Default Title", 6, "12.50", Some("Potters")),
        variant(3, Some("MUG"), "Mug (old listing)", "Default Title", 4, "11.00", None),
        variant(4, Some("CAP"), "Cap", "Default Title", 100, "15.00", Some("Acme")),
        variant(5, Some("PIN"), "Pin", "Default Title", 4, "3.00", None),
        variant(6, None, "Gift card", "Default Title", 0, "25.00", None),
    ];
    let sales: BTreeMap<String, u64> = [
        ("TEE-S", 180),
        ("MUG", 90),
        ("CAP", 90),
        ("DISCONTINUED", 40),
    ]
    .into_iter()
    .map(|(sku, units)| (sku.to_string(), units))
    .collect();

    InventorySnapshot::new(aggregate_variants(variants), sales, 90, Utc::now())
}

fn status_of(rows: &[stocksense_admin::services::InventoryRow], sku: &str) -> StockStatus {
    rows.iter().find(|r| r.sku == sku).unwrap().health.status
}

#[test]
fn test_rows_classify_each_sku() {
    let rows = snapshot().rows(&StockSettings::default());

    assert_eq!(rows.len(), 4);
    assert_eq!(status_of(&rows, "TEE-S"), StockStatus::Low);
    assert_eq!(status_of(&rows, "MUG"), StockStatus::Medium);
    assert_eq!(status_of(&rows, "CAP"), StockStatus::Good);
    assert_eq!(status_of(&rows, "PIN"), StockStatus::Good);
}

#[test]
fn test_duplicate_skus_keep_first_variant_details() {
    let snapshot = snapshot();
    let mug = snapshot.skus().get("MUG").unwrap();

    assert_eq!(mug.available_stock, 10);
    assert_eq!(mug.title, "Mug");
    assert_eq!(mug.price, Decimal::new(1250, 2));
    assert_eq!(mug.vendor.as_deref(), Some("Potters"));
}

#[test]
fn test_sales_for_unknown_skus_are_ignored() {
    let snapshot = snapshot();
    assert_eq!(snapshot.units_sold("DISCONTINUED"), 0);
    assert_eq!(snapshot.units_sold("TEE-S"), 180);
}

#[test]
fn test_settings_change_reclassifies_without_refetch() {
    let snapshot = snapshot();
    let strict = StockSettings {
        low_stock_threshold: 12,
        medium_stock_threshold: 30,
        ..StockSettings::default()
    };

    let rows = snapshot.rows(&strict);
    assert_eq!(status_of(&rows, "MUG"), StockStatus::Low);
    assert_eq!(status_of(&rows, "TEE-S"), StockStatus::Low);
}

#[test]
fn test_dashboard_summary() {
    let rows = snapshot().rows(&StockSettings::default());
    let summary = DashboardSummary::from_rows(&rows);

    assert_eq!(summary.total_skus, 4);
    assert_eq!(summary.low_count, 1);
    assert_eq!(summary.medium_count, 1);
    assert_eq!(summary.good_count, 2);

    // TEE-S: target 60, shortfall 50, ×1.1 = 55
    // MUG: target 30, shortfall 20, ×1.1 = 22
    assert_eq!(summary.needs_reorder_count, 2);
    assert_eq!(summary.total_suggested_units, 77);

    // 55 × 20.00 + 22 × 12.50
    assert_eq!(summary.reorder_cost, Decimal::new(137_500, 2));

    let urgent: Vec<&str> = summary.most_urgent.iter().map(|r| r.sku.as_str()).collect();
    assert_eq!(urgent, vec!["TEE-S", "MUG"]);
}

#[test]
fn test_query_filters_and_sorts() {
    let rows = snapshot().rows(&StockSettings::default());

    let good = InventoryQuery {
        status: Some(StockStatus::Good),
        ..InventoryQuery::default()
    }
    .apply(rows.clone());
    assert_eq!(good.len(), 2);

    let searched = InventoryQuery {
        search: Some("acme".to_string()),
        sort: InventorySort::Sku,
        ..InventoryQuery::default()
    }
    .apply(rows);
    let skus: Vec<&str> = searched.iter().map(|r| r.sku.as_str()).collect();
    assert_eq!(skus, vec!["CAP", "TEE-S"]);
}

#[test]
fn test_drafts_one_purchase_order_per_vendor() {
    let rows = snapshot().rows(&StockSettings::default());
    let drafts = draft_purchase_orders(TEST_SHOP, &rows, &ReorderSelection::default());

    let vendors: Vec<&str> = drafts.iter().map(|d| d.vendor.as_str()).collect();
    assert_eq!(vendors, vec!["Acme", "Potters"]);

    for draft in &drafts {
        assert_eq!(draft.shop, TEST_SHOP);
        assert!(draft.validate().is_ok());
    }

    let acme = drafts.first().unwrap();
    assert_eq!(acme.items.len(), 1);
    assert_eq!(acme.items.first().unwrap().sku, "TEE-S");
    assert_eq!(acme.items.first().unwrap().quantity, 55);
    assert_eq!(acme.total_cost(), Decimal::new(110_000, 2));
}

#[test]
fn test_selection_limits_drafts() {
    let rows = snapshot().rows(&StockSettings::default());

    let only_mug = ReorderSelection {
        vendor: None,
        skus: vec!["MUG".to_string()],
    };
    let drafts = draft_purchase_orders(TEST_SHOP, &rows, &only_mug);
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts.first().unwrap().vendor, "Potters");

    let nobody = ReorderSelection {
        vendor: Some(UNASSIGNED_VENDOR.to_string()),
        skus: Vec::new(),
    };
    // PIN has no vendor but nothing to reorder.
    assert!(draft_purchase_orders(TEST_SHOP, &rows, &nobody).is_empty());
}
