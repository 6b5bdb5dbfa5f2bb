//! Product variant types for stock aggregation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::Connection;

/// Product status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Active,
    Draft,
    Archived,
    #[serde(other)]
    Unlisted,
}

/// The product a variant belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    /// Product ID.
    pub id: String,
    /// Product title.
    pub title: String,
    /// Vendor (used as the supplier on purchase orders).
    #[serde(default)]
    pub vendor: Option<String>,
    /// Product status.
    pub status: ProductStatus,
}

/// A product variant with its stock level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    /// Variant ID.
    pub id: String,
    /// SKU; variants without one are not tracked.
    #[serde(default)]
    pub sku: Option<String>,
    /// Variant title ("Default Title" for single-variant products).
    pub title: String,
    /// Unit price as a decimal string.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
    /// Units available across all locations.
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    /// Parent product.
    pub product: ProductRef,
}

impl VariantNode {
    /// Display title combining product and variant names.
    #[must_use]
    pub fn display_title(&self) -> String {
        if self.title.is_empty() || self.title == "Default Title" {
            self.product.title.clone()
        } else {
            format!("{} - {}", self.product.title, self.title)
        }
    }

    /// Trimmed SKU, or `None` when missing or blank.
    #[must_use]
    pub fn tracked_sku(&self) -> Option<&str> {
        self.sku.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Response data for the variants query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsData {
    pub product_variants: Connection<VariantNode>,
}
