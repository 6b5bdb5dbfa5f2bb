//! Purchase order repository.
//!
//! Every query is scoped by shop, so one shop can never read or change
//! another shop's orders by guessing an ID.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::instrument;

use stocksense_core::{PurchaseOrderId, PurchaseOrderItemId, PurchaseOrderStatus};

use super::RepositoryError;
use crate::models::{
    NewPurchaseOrder, PurchaseOrder, PurchaseOrderFilter, PurchaseOrderItem,
    PurchaseOrderSummary, PurchaseOrderWithItems,
};

/// Default page size for the purchase order list.
const DEFAULT_LIST_LIMIT: i64 = 100;

// =============================================================================
// Internal Row Types
// =============================================================================

const ORDER_COLUMNS: &str = r"
    po.id, po.shop, po.vendor, po.status, po.notes,
    po.created_at, po.updated_at, po.ordered_at, po.received_at
";

#[derive(Debug, sqlx::FromRow)]
struct PurchaseOrderRow {
    id: i64,
    shop: String,
    vendor: String,
    status: PurchaseOrderStatus,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    ordered_at: Option<DateTime<Utc>>,
    received_at: Option<DateTime<Utc>>,
}

impl From<PurchaseOrderRow> for PurchaseOrder {
    fn from(row: PurchaseOrderRow) -> Self {
        Self {
            id: PurchaseOrderId::new(row.id),
            shop: row.shop,
            vendor: row.vendor,
            status: row.status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            ordered_at: row.ordered_at,
            received_at: row.received_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PurchaseOrderSummaryRow {
    #[sqlx(flatten)]
    order: PurchaseOrderRow,
    item_count: i64,
    total_units: i64,
    total_cost: Decimal,
}

impl From<PurchaseOrderSummaryRow> for PurchaseOrderSummary {
    fn from(row: PurchaseOrderSummaryRow) -> Self {
        Self {
            order: row.order.into(),
            item_count: row.item_count,
            total_units: row.total_units,
            total_cost: row.total_cost,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PurchaseOrderItemRow {
    id: i64,
    purchase_order_id: i64,
    sku: String,
    title: String,
    quantity: i32,
    unit_cost: Decimal,
}

impl From<PurchaseOrderItemRow> for PurchaseOrderItem {
    fn from(row: PurchaseOrderItemRow) -> Self {
        Self {
            id: PurchaseOrderItemId::new(row.id),
            purchase_order_id: PurchaseOrderId::new(row.purchase_order_id),
            sku: row.sku,
            title: row.title,
            quantity: row.quantity,
            unit_cost: row.unit_cost,
        }
    }
}

/// Insert one validated draft and its lines on an open transaction.
async fn insert_draft(
    conn: &mut PgConnection,
    input: &NewPurchaseOrder,
) -> Result<PurchaseOrderWithItems, RepositoryError> {
    let query = format!(
        r"
        WITH po AS (
            INSERT INTO stocksense.purchase_orders (shop, vendor, status, notes)
            VALUES ($1, $2, 'draft', $3)
            RETURNING *
        )
        SELECT {ORDER_COLUMNS} FROM po
        "
    );
    let order: PurchaseOrder = sqlx::query_as::<_, PurchaseOrderRow>(&query)
        .bind(&input.shop)
        .bind(&input.vendor)
        .bind(&input.notes)
        .fetch_one(&mut *conn)
        .await?
        .into();

    let mut items = Vec::with_capacity(input.items.len());
    for item in &input.items {
        let row = sqlx::query_as::<_, PurchaseOrderItemRow>(
            r"
            INSERT INTO stocksense.purchase_order_items
                (purchase_order_id, sku, title, quantity, unit_cost)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, purchase_order_id, sku, title, quantity, unit_cost
            ",
        )
        .bind(order.id)
        .bind(&item.sku)
        .bind(&item.title)
        .bind(item.quantity)
        .bind(item.unit_cost)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "SKU {} appears twice on the order",
                    item.sku
                ));
            }
            RepositoryError::Database(e)
        })?;
        items.push(row.into());
    }

    Ok(PurchaseOrderWithItems { order, items })
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for purchase order database operations.
pub struct PurchaseOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PurchaseOrderRepository<'a> {
    /// Create a new purchase order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a shop's purchase orders with totals, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        shop: &str,
        filter: PurchaseOrderFilter,
    ) -> Result<Vec<PurchaseOrderSummary>, RepositoryError> {
        let query = format!(
            r"
            SELECT {ORDER_COLUMNS},
                COUNT(i.id) AS item_count,
                COALESCE(SUM(i.quantity), 0)::BIGINT AS total_units,
                COALESCE(SUM(i.quantity * i.unit_cost), 0)::NUMERIC AS total_cost
            FROM stocksense.purchase_orders po
            LEFT JOIN stocksense.purchase_order_items i ON i.purchase_order_id = po.id
            WHERE po.shop = $1
              AND ($2::stocksense.purchase_order_status IS NULL OR po.status = $2)
            GROUP BY po.id
            ORDER BY po.created_at DESC, po.id DESC
            LIMIT $3
            "
        );
        let rows = sqlx::query_as::<_, PurchaseOrderSummaryRow>(&query)
            .bind(shop)
            .bind(filter.status)
            .bind(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Number of orders still in progress (draft or ordered).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn count_open(&self, shop: &str) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM stocksense.purchase_orders
            WHERE shop = $1 AND status IN ('draft', 'ordered')
            ",
        )
        .bind(shop)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Get one order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        shop: &str,
        id: PurchaseOrderId,
    ) -> Result<Option<PurchaseOrderWithItems>, RepositoryError> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM stocksense.purchase_orders po \
             WHERE po.shop = $1 AND po.id = $2"
        );
        let Some(order) = sqlx::query_as::<_, PurchaseOrderRow>(&query)
            .bind(shop)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, PurchaseOrderItemRow>(
            r"
            SELECT id, purchase_order_id, sku, title, quantity, unit_cost
            FROM stocksense.purchase_order_items
            WHERE purchase_order_id = $1
            ORDER BY sku, id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(PurchaseOrderWithItems {
            order: order.into(),
            items: items.into_iter().map(Into::into).collect(),
        }))
    }

    /// Create several drafts in one transaction: either all are stored or
    /// none are.
    ///
    /// Every draft is validated before anything is written.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, `RepositoryError::Conflict` on a
    /// duplicate SKU within a draft, or `RepositoryError::Database`.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn create_many(
        &self,
        inputs: &[NewPurchaseOrder],
    ) -> Result<Vec<PurchaseOrderWithItems>, RepositoryError> {
        for input in inputs {
            input.validate()?;
        }
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(insert_draft(&mut tx, input).await?);
        }
        tx.commit().await?;

        tracing::info!(count = created.len(), "Created draft purchase orders");
        Ok(created)
    }

    /// Move an order to a new status.
    ///
    /// Stamps `ordered_at` / `received_at` on entering those statuses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist,
    /// `RepositoryError::PurchaseOrder` if the transition is not allowed, or
    /// `RepositoryError::Database`.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        shop: &str,
        id: PurchaseOrderId,
        next: PurchaseOrderStatus,
    ) -> Result<PurchaseOrder, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = lock_status(&mut tx, shop, id).await?;
        current.transition_to(next)?;

        let query = format!(
            r"
            WITH po AS (
                UPDATE stocksense.purchase_orders
                SET status = $3,
                    updated_at = NOW(),
                    ordered_at = CASE WHEN $3 = 'ordered'::stocksense.purchase_order_status
                                      THEN NOW() ELSE ordered_at END,
                    received_at = CASE WHEN $3 = 'received'::stocksense.purchase_order_status
                                       THEN NOW() ELSE received_at END
                WHERE shop = $1 AND id = $2
                RETURNING *
            )
            SELECT {ORDER_COLUMNS} FROM po
            "
        );
        let order: PurchaseOrder = sqlx::query_as::<_, PurchaseOrderRow>(&query)
            .bind(shop)
            .bind(id)
            .bind(next)
            .fetch_one(&mut *tx)
            .await?
            .into();

        tx.commit().await?;

        tracing::info!(
            po = %order.number(),
            from = %current,
            to = %next,
            "Purchase order status changed"
        );
        Ok(order)
    }

    /// Delete a draft order and its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist,
    /// `RepositoryError::PurchaseOrder` if it is no longer a draft, or
    /// `RepositoryError::Database`.
    #[instrument(skip(self))]
    pub async fn delete_draft(
        &self,
        shop: &str,
        id: PurchaseOrderId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = lock_status(&mut tx, shop, id).await?;
        if !current.is_editable() {
            return Err(stocksense_core::PurchaseOrderError::NotEditable(current).into());
        }

        sqlx::query("DELETE FROM stocksense.purchase_orders WHERE shop = $1 AND id = $2")
            .bind(shop)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Lock an order row for update and return its status.
async fn lock_status(
    tx: &mut Transaction<'_, Postgres>,
    shop: &str,
    id: PurchaseOrderId,
) -> Result<PurchaseOrderStatus, RepositoryError> {
    sqlx::query_scalar::<_, PurchaseOrderStatus>(
        "SELECT status FROM stocksense.purchase_orders WHERE shop = $1 AND id = $2 FOR UPDATE",
    )
    .bind(shop)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(RepositoryError::NotFound)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sqlx::postgres::PgPoolOptions;
    use stocksense_core::PurchaseOrderError;

    use super::*;
    use crate::models::NewPurchaseOrderItem;

    /// Pool that fails any query; proves a code path returned before I/O.
    fn offline_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(100))
            .connect_lazy("postgres://stocksense@127.0.0.1:1/stocksense")
            .unwrap()
    }

    fn draft(vendor: &str, quantity: i32) -> NewPurchaseOrder {
        NewPurchaseOrder {
            shop: "demo.myshopify.com".to_string(),
            vendor: vendor.to_string(),
            notes: None,
            items: vec![NewPurchaseOrderItem {
                sku: format!("{vendor}-SKU"),
                title: "Widget".to_string(),
                quantity,
                unit_cost: Decimal::new(500, 2),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_many_validates_every_draft_before_writing() {
        let pool = offline_pool();
        let repo = PurchaseOrderRepository::new(&pool);

        // A later invalid draft must stop the batch before the first insert.
        let err = repo
            .create_many(&[draft("Acme", 5), draft("Potters", 0)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::PurchaseOrder(PurchaseOrderError::InvalidQuantity { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_many_with_no_drafts_touches_nothing() {
        let pool = offline_pool();
        let created = PurchaseOrderRepository::new(&pool)
            .create_many(&[])
            .await
            .unwrap();
        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn test_create_many_surfaces_database_failure() {
        let pool = offline_pool();
        let err = PurchaseOrderRepository::new(&pool)
            .create_many(&[draft("Acme", 5)])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
