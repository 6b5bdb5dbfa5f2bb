//! Purchase order route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use stocksense_core::{PurchaseOrderId, PurchaseOrderStatus};

use crate::db::PurchaseOrderRepository;
use crate::error::AppError;
use crate::filters;
use crate::models::{
    PurchaseOrder, PurchaseOrderFilter, PurchaseOrderSummary, PurchaseOrderWithItems,
};
use crate::services::{ReorderSelection, draft_purchase_orders};
use crate::state::AppState;

use super::inventory::evaluated_rows;

// =============================================================================
// Views
// =============================================================================

/// Purchase order row for the list page.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRowView {
    pub id: i64,
    pub number: String,
    pub vendor: String,
    pub status: PurchaseOrderStatus,
    pub status_class: &'static str,
    pub item_count: i64,
    pub total_units: i64,
    pub total_cost: Decimal,
    pub created_at: String,
}

impl From<&PurchaseOrderSummary> for PurchaseOrderRowView {
    fn from(summary: &PurchaseOrderSummary) -> Self {
        let order = &summary.order;
        Self {
            id: order.id.as_i64(),
            number: order.number(),
            vendor: order.vendor.clone(),
            status: order.status,
            status_class: status_class(order.status),
            item_count: summary.item_count,
            total_units: summary.total_units,
            total_cost: summary.total_cost,
            created_at: order.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// CSS classes for a purchase order status badge.
#[must_use]
pub const fn status_class(status: PurchaseOrderStatus) -> &'static str {
    match status {
        PurchaseOrderStatus::Draft => {
            "bg-gray-100 text-gray-700 dark:bg-gray-800 dark:text-gray-400"
        }
        PurchaseOrderStatus::Ordered => {
            "bg-blue-100 text-blue-700 dark:bg-blue-900/30 dark:text-blue-400"
        }
        PurchaseOrderStatus::Received => {
            "bg-green-100 text-green-700 dark:bg-green-900/30 dark:text-green-400"
        }
        PurchaseOrderStatus::Cancelled => {
            "bg-red-100 text-red-700 dark:bg-red-900/30 dark:text-red-400"
        }
    }
}

fn format_timestamp(ts: Option<chrono::DateTime<chrono::Utc>>) -> Option<String> {
    ts.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
}

// =============================================================================
// Templates
// =============================================================================

/// Purchase order list template.
#[derive(Template, WebTemplate)]
#[template(path = "purchase_orders/index.html")]
pub struct PurchaseOrdersIndexTemplate {
    pub current_path: String,
    pub shop: String,
    pub orders: Vec<PurchaseOrderRowView>,
    pub selected_status: String,
    pub statuses: [PurchaseOrderStatus; 4],
    pub notice: Option<String>,
}

/// Purchase order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "purchase_orders/show.html")]
pub struct PurchaseOrderShowTemplate {
    pub current_path: String,
    pub shop: String,
    pub order: PurchaseOrder,
    pub number: String,
    pub status_class: &'static str,
    pub detail: PurchaseOrderWithItems,
    pub next_statuses: Vec<PurchaseOrderStatus>,
    pub ordered_at: Option<String>,
    pub received_at: Option<String>,
    pub created_at: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Query parameters for the list page.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub created: Option<usize>,
}

/// Purchase order list page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<PurchaseOrdersIndexTemplate, AppError> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<PurchaseOrderStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let orders = PurchaseOrderRepository::new(state.pool())
        .list(
            state.shop(),
            PurchaseOrderFilter {
                status,
                limit: None,
            },
        )
        .await?;

    let notice = params.created.map(|n| match n {
        0 => "Nothing to reorder for that selection.".to_string(),
        1 => "Created 1 draft purchase order.".to_string(),
        n => format!("Created {n} draft purchase orders."),
    });

    Ok(PurchaseOrdersIndexTemplate {
        current_path: "/purchase-orders".to_string(),
        shop: state.shop().to_string(),
        orders: orders.iter().map(PurchaseOrderRowView::from).collect(),
        selected_status: status.map(|s| s.as_str().to_string()).unwrap_or_default(),
        statuses: PurchaseOrderStatus::ALL,
        notice,
    })
}

/// Read a draft selection from repeated form fields.
///
/// Accepts `vendor=<name>` (at most one) and any number of `sku=<sku>`.
#[must_use]
pub fn parse_selection(fields: &[(String, String)]) -> ReorderSelection {
    let mut selection = ReorderSelection::default();
    for (key, value) in fields {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "vendor" => selection.vendor = Some(value.to_string()),
            "sku" => selection.skus.push(value.to_string()),
            _ => {}
        }
    }
    selection
}

/// Create draft purchase orders from current reorder suggestions.
///
/// One draft per vendor. Redirects to the draft when exactly one was
/// created, otherwise to the list with a notice.
#[instrument(skip(state, fields))]
pub async fn create(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let selection = parse_selection(&fields);
    let (rows, _) = evaluated_rows(&state).await?;
    let drafts = draft_purchase_orders(state.shop(), &rows, &selection);

    let created = PurchaseOrderRepository::new(state.pool())
        .create_many(&drafts)
        .await?;

    tracing::info!(count = created.len(), "Drafted purchase orders from suggestions");

    match created.as_slice() {
        [only] => Ok(Redirect::to(&format!(
            "/purchase-orders/{}",
            only.order.id
        ))),
        _ => Ok(Redirect::to(&format!(
            "/purchase-orders?created={}",
            created.len()
        ))),
    }
}

/// Purchase order detail page handler.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<PurchaseOrderShowTemplate, AppError> {
    let id = PurchaseOrderId::new(id);
    let detail = PurchaseOrderRepository::new(state.pool())
        .get(state.shop(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("purchase order {id}")))?;

    let order = detail.order.clone();
    Ok(PurchaseOrderShowTemplate {
        current_path: "/purchase-orders".to_string(),
        shop: state.shop().to_string(),
        number: order.number(),
        status_class: status_class(order.status),
        next_statuses: order.status.next_statuses(),
        ordered_at: format_timestamp(order.ordered_at),
        received_at: format_timestamp(order.received_at),
        created_at: order.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        order,
        detail,
    })
}

/// Form input for a status change.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Move a purchase order to a new status.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    let next: PurchaseOrderStatus = form.status.parse().map_err(AppError::BadRequest)?;
    let id = PurchaseOrderId::new(id);

    PurchaseOrderRepository::new(state.pool())
        .update_status(state.shop(), id, next)
        .await?;

    Ok(Redirect::to(&format!("/purchase-orders/{id}")))
}

/// Delete a draft purchase order.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    PurchaseOrderRepository::new(state.pool())
        .delete_draft(state.shop(), PurchaseOrderId::new(id))
        .await?;

    Ok(Redirect::to("/purchase-orders"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_parse_selection() {
        let selection = parse_selection(&[
            field("vendor", "Acme"),
            field("sku", "TEE-1"),
            field("sku", " MUG-1 "),
            field("sku", ""),
            field("csrf", "ignored"),
        ]);
        assert_eq!(selection.vendor.as_deref(), Some("Acme"));
        assert_eq!(selection.skus, vec!["TEE-1".to_string(), "MUG-1".to_string()]);
    }

    #[test]
    fn test_empty_form_selects_everything() {
        let selection = parse_selection(&[field("vendor", "")]);
        assert!(selection.vendor.is_none());
        assert!(selection.skus.is_empty());
    }
}
