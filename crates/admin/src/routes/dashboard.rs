//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use stocksense_core::StockSettings;

use crate::db::PurchaseOrderRepository;
use crate::error::AppError;
use crate::filters;
use crate::services::DashboardSummary;
use crate::state::AppState;

use super::inventory::{InventoryRowView, evaluated_rows};

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub shop: String,
    pub summary: DashboardSummary,
    pub most_urgent: Vec<InventoryRowView>,
    pub open_purchase_orders: i64,
    pub settings: StockSettings,
    pub fetched_at: String,
    pub window_days: u32,
}

/// Dashboard page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<DashboardTemplate, AppError> {
    let po_repo = PurchaseOrderRepository::new(state.pool());
    let (evaluated, open_purchase_orders) =
        tokio::join!(evaluated_rows(&state), po_repo.count_open(state.shop()));
    let (rows, meta) = evaluated?;
    let open_purchase_orders = open_purchase_orders?;

    let summary = DashboardSummary::from_rows(&rows);
    let most_urgent = summary
        .most_urgent
        .iter()
        .map(InventoryRowView::from)
        .collect();

    Ok(DashboardTemplate {
        current_path: "/".to_string(),
        shop: state.shop().to_string(),
        summary,
        most_urgent,
        open_purchase_orders,
        settings: meta.settings,
        fetched_at: meta.fetched_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        window_days: meta.window_days,
    })
}
