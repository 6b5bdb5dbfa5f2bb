//! Inventory list and JSON export.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stocksense_core::{StockSettings, StockStatus};

use crate::db::SettingsRepository;
use crate::error::AppError;
use crate::filters;
use crate::services::{InventoryQuery, InventoryRow, InventorySort};
use crate::state::AppState;

/// Query parameters for the inventory list and export.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryParams {
    pub status: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

impl InventoryParams {
    /// Parse into a typed query; empty values mean "no filter".
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown status or sort.
    pub fn parse(&self) -> Result<InventoryQuery, AppError> {
        let status = non_empty(self.status.as_deref())
            .map(str::parse::<StockStatus>)
            .transpose()
            .map_err(AppError::BadRequest)?;
        let sort = non_empty(self.sort.as_deref())
            .map(str::parse::<InventorySort>)
            .transpose()
            .map_err(AppError::BadRequest)?
            .unwrap_or_default();

        Ok(InventoryQuery {
            status,
            search: non_empty(self.q.as_deref()).map(str::to_string),
            sort,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Inventory row view for templates.
#[derive(Debug, Clone)]
pub struct InventoryRowView {
    pub sku: String,
    pub title: String,
    pub vendor: String,
    pub stock: i64,
    pub units_sold: u64,
    pub velocity: String,
    pub days_of_stock: String,
    pub status: StockStatus,
    pub status_class: &'static str,
    pub suggested: u64,
    pub reorder_cost: Decimal,
}

impl From<&InventoryRow> for InventoryRowView {
    fn from(row: &InventoryRow) -> Self {
        Self {
            sku: row.sku.clone(),
            title: row.title.clone(),
            vendor: row.vendor.clone().unwrap_or_default(),
            stock: row.available_stock,
            units_sold: row.units_sold,
            velocity: format!("{:.2}", row.velocity_per_day()),
            days_of_stock: row
                .health
                .days_of_stock
                .map_or_else(|| "∞".to_string(), |days| format!("{days:.1}")),
            status: row.health.status,
            status_class: status_class(row.health.status),
            suggested: row.health.suggested_quantity,
            reorder_cost: row.reorder_cost(),
        }
    }
}

/// CSS classes for a status badge.
#[must_use]
pub const fn status_class(status: StockStatus) -> &'static str {
    match status {
        StockStatus::Low => "bg-red-100 text-red-700 dark:bg-red-900/30 dark:text-red-400",
        StockStatus::Medium => {
            "bg-yellow-100 text-yellow-700 dark:bg-yellow-900/30 dark:text-yellow-400"
        }
        StockStatus::Good => "bg-green-100 text-green-700 dark:bg-green-900/30 dark:text-green-400",
    }
}

/// Inventory list template.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/index.html")]
pub struct InventoryIndexTemplate {
    pub current_path: String,
    pub shop: String,
    pub rows: Vec<InventoryRowView>,
    pub total_skus: usize,
    pub selected_status: String,
    pub search_query: String,
    pub selected_sort: InventorySort,
    pub statuses: [StockStatus; 3],
    pub sorts: [InventorySort; 5],
    pub fetched_at: String,
    pub window_days: u32,
}

/// Inventory list page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<InventoryParams>,
) -> Result<InventoryIndexTemplate, AppError> {
    let query = params.parse()?;
    let (rows, snapshot_meta) = evaluated_rows(&state).await?;
    let total_skus = rows.len();
    let rows = query.apply(rows);

    Ok(InventoryIndexTemplate {
        current_path: "/inventory".to_string(),
        shop: state.shop().to_string(),
        rows: rows.iter().map(InventoryRowView::from).collect(),
        total_skus,
        selected_status: query.status.map(|s| s.as_str().to_string()).unwrap_or_default(),
        search_query: query.search.unwrap_or_default(),
        selected_sort: query.sort,
        statuses: StockStatus::ALL,
        sorts: InventorySort::ALL,
        fetched_at: snapshot_meta.fetched_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        window_days: snapshot_meta.window_days,
    })
}

/// JSON body for `/api/inventory`.
#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub shop: String,
    pub fetched_at: DateTime<Utc>,
    pub window_days: u32,
    pub settings: StockSettings,
    pub rows: Vec<InventoryRow>,
}

/// Inventory rows as JSON, with the same filters as the list page.
#[instrument(skip(state))]
pub async fn api_index(
    State(state): State<AppState>,
    Query(params): Query<InventoryParams>,
) -> Result<Json<InventoryResponse>, AppError> {
    let query = params.parse()?;
    let (rows, meta) = evaluated_rows(&state).await?;

    Ok(Json(InventoryResponse {
        shop: state.shop().to_string(),
        fetched_at: meta.fetched_at,
        window_days: meta.window_days,
        settings: meta.settings,
        rows: query.apply(rows),
    }))
}

/// Drop the cached snapshot and go back to the list.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Redirect {
    state.inventory().invalidate().await;
    Redirect::to("/inventory")
}

/// Snapshot details carried alongside evaluated rows.
pub struct SnapshotMeta {
    pub fetched_at: DateTime<Utc>,
    pub window_days: u32,
    pub settings: StockSettings,
}

/// Fetch the snapshot and the shop's settings concurrently and evaluate
/// every SKU.
///
/// # Errors
///
/// Returns an error if Shopify or the settings lookup fails.
pub async fn evaluated_rows(
    state: &AppState,
) -> Result<(Vec<InventoryRow>, SnapshotMeta), AppError> {
    let settings_repo = SettingsRepository::new(state.pool());
    let (snapshot, settings) = tokio::join!(
        state.inventory().snapshot(),
        settings_repo.get_or_default(state.shop())
    );
    let snapshot = snapshot?;
    let settings = settings?;

    let rows = snapshot.rows(&settings);
    Ok((
        rows,
        SnapshotMeta {
            fetched_at: snapshot.fetched_at(),
            window_days: snapshot.window_days(),
            settings,
        },
    ))
}
