//! Per-SKU inventory aggregation and stock health rows.
//!
//! A fetch cycle produces an [`InventorySnapshot`]: the SKU map built from
//! Shopify variants plus units sold per SKU over the sales window. Health
//! metrics are derived from a snapshot and the shop's current settings on
//! every request, so a settings change shows up without refetching.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use stocksense_core::{SalesVelocity, StockHealth, StockSettings, StockStatus, evaluate};

use crate::shopify::VariantNode;

/// Number of SKUs shown in the dashboard's "most urgent" table.
pub const MOST_URGENT_LIMIT: usize = 10;

/// Aggregated stock for one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkuRecord {
    /// Units available, summed across every variant sharing the SKU.
    pub available_stock: i64,
    /// Unit price of the first variant seen.
    pub price: Decimal,
    /// Display title of the first variant seen.
    pub title: String,
    /// Vendor of the first variant seen.
    pub vendor: Option<String>,
}

/// SKU-keyed aggregation buffer, sorted by SKU.
pub type SkuMap = BTreeMap<String, SkuRecord>;

/// Build the SKU map from raw variants.
///
/// Variants without a SKU are skipped. Variants sharing a SKU have their
/// stock summed; title, vendor and price come from the first one.
#[must_use]
pub fn aggregate_variants<I>(variants: I) -> SkuMap
where
    I: IntoIterator<Item = VariantNode>,
{
    let mut skus = SkuMap::new();

    for variant in variants {
        let Some(sku) = variant.tracked_sku() else {
            continue;
        };
        let stock = variant.inventory_quantity.unwrap_or(0);

        if let Some(record) = skus.get_mut(sku) {
            record.available_stock = record.available_stock.saturating_add(stock);
            continue;
        }

        let record = SkuRecord {
            available_stock: stock,
            price: variant.price.unwrap_or(Decimal::ZERO),
            title: variant.display_title(),
            vendor: variant
                .product
                .vendor
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        };
        skus.insert(sku.to_string(), record);
    }

    skus
}

/// Inventory and sales for one shop at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct InventorySnapshot {
    skus: SkuMap,
    sales: BTreeMap<String, u64>,
    window_days: u32,
    fetched_at: DateTime<Utc>,
}

impl InventorySnapshot {
    /// Build a snapshot, dropping sales for SKUs that are not in the map.
    #[must_use]
    pub fn new(
        skus: SkuMap,
        mut sales: BTreeMap<String, u64>,
        window_days: u32,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        sales.retain(|sku, _| skus.contains_key(sku));
        Self {
            skus,
            sales,
            window_days,
            fetched_at,
        }
    }

    /// The SKU map.
    #[must_use]
    pub const fn skus(&self) -> &SkuMap {
        &self.skus
    }

    /// Units sold for `sku` over the window.
    #[must_use]
    pub fn units_sold(&self, sku: &str) -> u64 {
        self.sales.get(sku).copied().unwrap_or(0)
    }

    /// Sales velocity for `sku`.
    #[must_use]
    pub fn velocity(&self, sku: &str) -> SalesVelocity {
        SalesVelocity::new(self.units_sold(sku), self.window_days)
    }

    /// Length of the sales window in days.
    #[must_use]
    pub const fn window_days(&self) -> u32 {
        self.window_days
    }

    /// When the data was fetched from Shopify.
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Evaluate every SKU against `settings`, in SKU order.
    #[must_use]
    pub fn rows(&self, settings: &StockSettings) -> Vec<InventoryRow> {
        self.skus
            .iter()
            .map(|(sku, record)| {
                let velocity = self.velocity(sku);
                InventoryRow {
                    sku: sku.clone(),
                    title: record.title.clone(),
                    vendor: record.vendor.clone(),
                    available_stock: record.available_stock,
                    price: record.price,
                    units_sold: velocity.units_sold(),
                    velocity,
                    health: evaluate(record.available_stock, velocity, settings),
                }
            })
            .collect()
    }
}

/// One SKU with its computed stock health.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub sku: String,
    pub title: String,
    pub vendor: Option<String>,
    pub available_stock: i64,
    pub price: Decimal,
    /// Units sold over the sales window.
    pub units_sold: u64,
    #[serde(skip)]
    pub velocity: SalesVelocity,
    pub health: StockHealth,
}

impl InventoryRow {
    /// Units sold per day.
    #[must_use]
    pub fn velocity_per_day(&self) -> f64 {
        self.velocity.as_f64()
    }

    /// Value of stock on hand (negative stock counts as zero).
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.available_stock.max(0)) * self.price
    }

    /// Estimated cost of the suggested reorder.
    #[must_use]
    pub fn reorder_cost(&self) -> Decimal {
        Decimal::from(self.health.suggested_quantity) * self.price
    }

    /// Whether the row matches a case-insensitive search on SKU, title or vendor.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.sku.to_lowercase().contains(&needle)
            || self.title.to_lowercase().contains(&needle)
            || self
                .vendor
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&needle))
    }

    /// Ascending days of stock, infinite last, then by SKU.
    fn cmp_urgency(&self, other: &Self) -> Ordering {
        let days = match (self.health.days_of_stock, other.health.days_of_stock) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        days.then_with(|| self.sku.cmp(&other.sku))
    }
}

/// Sort order for the inventory list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InventorySort {
    /// Fewest days of stock first.
    #[default]
    Urgency,
    Sku,
    /// Lowest stock first.
    Stock,
    /// Fastest sellers first.
    Velocity,
    /// Largest suggestion first.
    Suggested,
}

impl InventorySort {
    pub const ALL: [Self; 5] = [
        Self::Urgency,
        Self::Sku,
        Self::Stock,
        Self::Velocity,
        Self::Suggested,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Urgency => "urgency",
            Self::Sku => "sku",
            Self::Stock => "stock",
            Self::Velocity => "velocity",
            Self::Suggested => "suggested",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Urgency => "Urgency",
            Self::Sku => "SKU",
            Self::Stock => "Stock",
            Self::Velocity => "Velocity",
            Self::Suggested => "Suggested qty",
        }
    }

    fn compare(self, a: &InventoryRow, b: &InventoryRow) -> Ordering {
        match self {
            Self::Urgency => a.cmp_urgency(b),
            Self::Sku => a.sku.cmp(&b.sku),
            Self::Stock => a
                .available_stock
                .cmp(&b.available_stock)
                .then_with(|| a.sku.cmp(&b.sku)),
            Self::Velocity => b
                .velocity_per_day()
                .total_cmp(&a.velocity_per_day())
                .then_with(|| a.sku.cmp(&b.sku)),
            Self::Suggested => b
                .health
                .suggested_quantity
                .cmp(&a.health.suggested_quantity)
                .then_with(|| a.sku.cmp(&b.sku)),
        }
    }
}

impl fmt::Display for InventorySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventorySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| format!("unknown sort: {s}"))
    }
}

/// Filter, search and sort options for the inventory list.
#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    pub status: Option<StockStatus>,
    pub search: Option<String>,
    pub sort: InventorySort,
}

impl InventoryQuery {
    /// Apply the query to a set of rows.
    #[must_use]
    pub fn apply(&self, rows: Vec<InventoryRow>) -> Vec<InventoryRow> {
        let mut rows: Vec<InventoryRow> = rows
            .into_iter()
            .filter(|row| self.status.is_none_or(|status| row.health.status == status))
            .filter(|row| self.search.as_deref().is_none_or(|q| row.matches(q)))
            .collect();
        rows.sort_by(|a, b| self.sort.compare(a, b));
        rows
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSummary {
    pub total_skus: usize,
    pub low_count: usize,
    pub medium_count: usize,
    pub good_count: usize,
    /// SKUs with a suggested quantity above zero.
    pub needs_reorder_count: usize,
    pub total_suggested_units: u64,
    /// Σ max(stock, 0) × price.
    pub inventory_value: Decimal,
    /// Σ suggested × price.
    pub reorder_cost: Decimal,
    /// Low and medium SKUs, most urgent first.
    pub most_urgent: Vec<InventoryRow>,
}

impl DashboardSummary {
    /// Summarise evaluated rows.
    #[must_use]
    pub fn from_rows(rows: &[InventoryRow]) -> Self {
        let mut summary = Self {
            total_skus: rows.len(),
            ..Self::default()
        };

        for row in rows {
            match row.health.status {
                StockStatus::Low => summary.low_count += 1,
                StockStatus::Medium => summary.medium_count += 1,
                StockStatus::Good => summary.good_count += 1,
            }
            if row.health.needs_reorder() {
                summary.needs_reorder_count += 1;
            }
            summary.total_suggested_units = summary
                .total_suggested_units
                .saturating_add(row.health.suggested_quantity);
            summary.inventory_value += row.stock_value();
            summary.reorder_cost += row.reorder_cost();
        }

        let mut urgent: Vec<InventoryRow> = rows
            .iter()
            .filter(|row| row.health.status != StockStatus::Good)
            .cloned()
            .collect();
        urgent.sort_by(InventoryRow::cmp_urgency);
        urgent.truncate(MOST_URGENT_LIMIT);
        summary.most_urgent = urgent;

        summary
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn variant(
        sku: Option<&str>,
        title: &str,
        stock: i64,
        price: &str,
        vendor: &str,
    ) -> VariantNode {
        serde_json::from_value(serde_json::json!({
            "id": format!("gid://shopify/ProductVariant/{title}"),
            "sku": sku,
            "title": "Default Title",
            "price": price,
            "inventoryQuantity": stock,
            "product": {
                "id": "gid://shopify/Product/1",
                "title": title,
                "vendor": vendor,
                "status": "ACTIVE"
            }
        }))
        .unwrap()
    }

    fn snapshot(variants: Vec<VariantNode>, sales: &[(&str, u64)]) -> InventorySnapshot {
        let sales = sales.iter().map(|(s, q)| ((*s).to_string(), *q)).collect();
        InventorySnapshot::new(aggregate_variants(variants), sales, 90, Utc::now())
    }

    #[test]
    fn test_variants_without_sku_are_skipped() {
        let skus = aggregate_variants(vec![
            variant(Some("TEE-1"), "Tee", 5, "20.00", "Acme"),
            variant(None, "Gift card", 100, "50.00", "Acme"),
            variant(Some("  "), "Sticker", 3, "1.00", "Acme"),
        ]);
        assert_eq!(skus.len(), 1);
        assert!(skus.contains_key("TEE-1"));
    }

    #[test]
    fn test_duplicate_skus_are_summed_first_wins() {
        let skus = aggregate_variants(vec![
            variant(Some("MUG"), "Mug (warehouse A)", 4, "12.00", "Acme"),
            variant(Some("MUG"), "Mug (warehouse B)", 6, "99.00", "Other"),
        ]);
        let record = skus.get("MUG").unwrap();
        assert_eq!(record.available_stock, 10);
        assert_eq!(record.title, "Mug (warehouse A)");
        assert_eq!(record.price, Decimal::new(1200, 2));
        assert_eq!(record.vendor.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_sales_for_unknown_skus_are_ignored() {
        let snap = snapshot(
            vec![variant(Some("TEE-1"), "Tee", 5, "20.00", "Acme")],
            &[("TEE-1", 9), ("DISCONTINUED", 40)],
        );
        assert_eq!(snap.units_sold("TEE-1"), 9);
        assert_eq!(snap.units_sold("DISCONTINUED"), 0);
        assert_eq!(snap.rows(&StockSettings::default()).len(), 1);
    }

    #[test]
    fn test_rows_carry_health() {
        // 180 units / 90 days = 2/day; stock 10 -> low, suggest 55.
        let snap = snapshot(
            vec![variant(Some("TEE-1"), "Tee", 10, "20.00", "Acme")],
            &[("TEE-1", 180)],
        );
        let rows = snap.rows(&StockSettings::default());
        let row = rows.first().unwrap();
        assert_eq!(row.health.status, StockStatus::Low);
        assert_eq!(row.health.suggested_quantity, 55);
        assert_eq!(row.reorder_cost(), Decimal::from(1100));
        assert_eq!(row.stock_value(), Decimal::from(200));
    }

    #[test]
    fn test_query_filters_and_searches() {
        let snap = snapshot(
            vec![
                variant(Some("TEE-1"), "Black Tee", 10, "20.00", "Acme"),
                variant(Some("MUG-1"), "Mug", 500, "12.00", "Ceramics Co"),
                variant(Some("CAP-1"), "Cap", 1, "15.00", "Acme"),
            ],
            &[("TEE-1", 180), ("MUG-1", 90), ("CAP-1", 90)],
        );
        let rows = snap.rows(&StockSettings::default());

        let low = InventoryQuery {
            status: Some(StockStatus::Low),
            ..InventoryQuery::default()
        }
        .apply(rows.clone());
        let low_skus: Vec<&str> = low.iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(low_skus, vec!["CAP-1", "TEE-1"]);

        let ceramics = InventoryQuery {
            search: Some("CERAMICS".to_string()),
            ..InventoryQuery::default()
        }
        .apply(rows);
        assert_eq!(ceramics.len(), 1);
        assert_eq!(ceramics.first().map(|r| r.sku.as_str()), Some("MUG-1"));
    }

    #[test]
    fn test_urgency_puts_non_selling_last() {
        let snap = snapshot(
            vec![
                variant(Some("A"), "A", 0, "1.00", "V"),
                variant(Some("B"), "B", 50, "1.00", "V"),
                variant(Some("C"), "C", 5, "1.00", "V"),
            ],
            &[("B", 90), ("C", 90)],
        );
        let rows = InventoryQuery::default().apply(snap.rows(&StockSettings::default()));
        let order: Vec<&str> = rows.iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("suggested".parse::<InventorySort>(), Ok(InventorySort::Suggested));
        assert!("price".parse::<InventorySort>().is_err());
    }

    #[test]
    fn test_dashboard_summary() {
        let snap = snapshot(
            vec![
                variant(Some("TEE-1"), "Tee", 10, "20.00", "Acme"),
                variant(Some("MUG-1"), "Mug", 500, "12.00", "Acme"),
                variant(Some("CAP-1"), "Cap", -2, "15.00", "Acme"),
            ],
            &[("TEE-1", 180), ("MUG-1", 90)],
        );
        let summary = DashboardSummary::from_rows(&snap.rows(&StockSettings::default()));

        assert_eq!(summary.total_skus, 3);
        assert_eq!(summary.low_count, 1);
        assert_eq!(summary.good_count, 2);
        assert_eq!(summary.needs_reorder_count, 1);
        assert_eq!(summary.total_suggested_units, 55);
        // 10 × 20 + 500 × 12 + 0
        assert_eq!(summary.inventory_value, Decimal::from(6200));
        assert_eq!(summary.reorder_cost, Decimal::from(1100));
        assert_eq!(summary.most_urgent.len(), 1);
    }
}
