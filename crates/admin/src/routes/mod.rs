//! HTTP route handlers for StockSense.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database)
//!
//! # Dashboard
//! GET  /                            - Stock health overview
//!
//! # Inventory
//! GET  /inventory                   - Inventory list (?status=&q=&sort=)
//! POST /inventory/refresh           - Drop cached Shopify data
//! GET  /api/inventory               - Inventory rows as JSON
//!
//! # Purchase Orders
//! GET  /purchase-orders             - Purchase order list (?status=)
//! POST /purchase-orders             - Draft orders from reorder suggestions
//! GET  /purchase-orders/{id}        - Purchase order detail
//! POST /purchase-orders/{id}/status - Change status
//! POST /purchase-orders/{id}/delete - Delete a draft
//!
//! # Settings
//! GET  /settings                    - Settings form
//! POST /settings                    - Save settings
//! ```

pub mod dashboard;
pub mod inventory;
pub mod purchase_orders;
pub mod settings;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the application router (without middleware layers).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/", get(dashboard::index))
        .route("/inventory", get(inventory::index))
        .route("/inventory/refresh", post(inventory::refresh))
        .route("/api/inventory", get(inventory::api_index))
        .route(
            "/purchase-orders",
            get(purchase_orders::index).post(purchase_orders::create),
        )
        .route("/purchase-orders/{id}", get(purchase_orders::show))
        .route(
            "/purchase-orders/{id}/status",
            post(purchase_orders::update_status),
        )
        .route("/purchase-orders/{id}/delete", post(purchase_orders::delete))
        .route("/settings", get(settings::index).post(settings::update))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
