//! Order repository.
//!
//! The admin API only reads orders. [`OrderRepository::create`] exists for
//! checkout integrations and demo seeding.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use shopdesk_core::{OrderId, Overview, OverviewItem, StoreId, monthly_overview};

use super::{RepositoryError, begin_snapshot, count_to_u64};
use crate::models::{NewOrder, OrderSummary};

/// Internal row type for the order table query.
#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    id: OrderId,
    phone: String,
    address: String,
    is_paid: bool,
    product_names: Vec<String>,
    total_price: Decimal,
    created_at: DateTime<Utc>,
}

impl From<OrderSummaryRow> for OrderSummary {
    fn from(row: OrderSummaryRow) -> Self {
        Self::new(
            row.id,
            row.phone,
            row.address,
            row.is_paid,
            &row.product_names,
            row.total_price,
            row.created_at,
        )
    }
}

/// Internal row type for aggregation input.
#[derive(Debug, sqlx::FromRow)]
struct OverviewItemRow {
    order_id: OrderId,
    placed_at: DateTime<Utc>,
    price: Decimal,
}

/// One entry per order item of the store, for the monthly overview.
async fn overview_items<'e>(
    executor: impl PgExecutor<'e>,
    store: StoreId,
) -> Result<Vec<OverviewItem>, sqlx::Error> {
    let rows = sqlx::query_as::<_, OverviewItemRow>(
        r"
        SELECT o.id AS order_id, o.created_at AS placed_at, p.price
        FROM shopdesk.order_item oi
        JOIN shopdesk.customer_order o ON o.store_id = oi.store_id AND o.id = oi.order_id
        JOIN shopdesk.product p ON p.store_id = oi.store_id AND p.id = oi.product_id
        WHERE oi.store_id = $1
        ",
    )
    .bind(store)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| OverviewItem {
            order_id: row.order_id,
            placed_at: row.placed_at,
            price: row.price,
        })
        .collect())
}

async fn count_orders<'e>(
    executor: impl PgExecutor<'e>,
    store: StoreId,
) -> Result<u64, RepositoryError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM shopdesk.customer_order WHERE store_id = $1")
            .bind(store)
            .fetch_one(executor)
            .await?;

    count_to_u64(count)
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's orders with product names and totals, newest first.
    ///
    /// Product names keep the order the items were placed in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r"
            SELECT o.id, o.phone, o.address, o.is_paid, o.created_at,
                   COALESCE(
                       ARRAY_AGG(p.name ORDER BY oi.position) FILTER (WHERE p.id IS NOT NULL),
                       ARRAY[]::text[]
                   ) AS product_names,
                   COALESCE(SUM(p.price), 0)::numeric AS total_price
            FROM shopdesk.customer_order o
            LEFT JOIN shopdesk.order_item oi ON oi.order_id = o.id
            LEFT JOIN shopdesk.product p ON p.store_id = oi.store_id AND p.id = oi.product_id
            WHERE o.store_id = $1
            GROUP BY o.id
            ORDER BY o.created_at DESC
            ",
        )
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Monthly order and revenue overview of the store.
    ///
    /// The items and the order count are read from one snapshot so the
    /// totals agree with the monthly series.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn overview(&self, store: StoreId) -> Result<Overview, RepositoryError> {
        let mut tx = begin_snapshot(self.pool).await?;
        let items = overview_items(&mut *tx, store).await?;
        let total_orders = count_orders(&mut *tx, store).await?;
        tx.commit().await?;

        Ok(monthly_overview(items, total_orders))
    }

    /// Number of orders of the store, with or without items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, store: StoreId) -> Result<u64, RepositoryError> {
        count_orders(self.pool, store).await
    }

    /// Record an order and its items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if a product is not in the
    /// store. Nothing is written on error.
    pub async fn create(&self, store: StoreId, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO shopdesk.customer_order (store_id, phone, address, is_paid)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(store)
        .bind(&order.phone)
        .bind(&order.address)
        .bind(order.is_paid)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        sqlx::query(
            r"
            INSERT INTO shopdesk.order_item (store_id, order_id, product_id, position)
            SELECT $1, $2, t.product_id, (t.ord - 1)::int
            FROM UNNEST($3::uuid[]) WITH ORDINALITY AS t(product_id, ord)
            ",
        )
        .bind(store)
        .bind(id)
        .bind(&order.product_ids)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        tx.commit().await?;

        Ok(id)
    }
}
