//! Order repository: sale records and scoped report queries.
//!
//! Monetary sums stay in `NUMERIC`/[`Decimal`] end to end; nothing here
//! accumulates floats. Scope filtering happens in SQL via `= ANY($1)` so an
//! order is counted exactly once however many hierarchy edges reach its
//! marketer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use vistapro_core::{OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderFilter, OrderSummary, OrderTotals};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    marketer_id: i32,
    device_name: String,
    device_model: String,
    number_of_devices: i32,
    sold_amount: Decimal,
    status: OrderStatus,
    sale_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            marketer_id: UserId::new(row.marketer_id),
            device_name: row.device_name,
            device_model: row.device_model,
            number_of_devices: row.number_of_devices,
            sold_amount: row.sold_amount,
            status: row.status,
            sale_date: row.sale_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for report line queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    id: i32,
    marketer_id: i32,
    device_name: String,
    number_of_devices: i32,
    sold_amount: Decimal,
    status: OrderStatus,
    sale_date: DateTime<Utc>,
}

impl From<OrderSummaryRow> for OrderSummary {
    fn from(row: OrderSummaryRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            marketer_id: UserId::new(row.marketer_id),
            device_name: row.device_name,
            number_of_devices: row.number_of_devices,
            sold_amount: row.sold_amount,
            status: row.status,
            sale_date: row.sale_date,
        }
    }
}

const ORDER_COLUMNS: &str = "id, marketer_id, device_name, device_model, number_of_devices, \
     sold_amount, status, sale_date, created_at, updated_at";

/// Shared report predicate: scope plus optional status and date window.
///
/// A NULL `$1` means the unscoped (MasterAdmin) view; the repository never
/// receives an empty scope array, the service layer short-circuits that to
/// the zero aggregate.
const REPORT_PREDICATE: &str = "($1::int4[] IS NULL OR o.marketer_id = ANY($1))
       AND ($2::order_status IS NULL OR o.status = $2)
       AND ($3::timestamptz IS NULL OR o.sale_date >= $3)
       AND ($4::timestamptz IS NULL OR o.sale_date < $4)";

// =============================================================================
// Repository
// =============================================================================

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

    /// Record a sale. New orders always start as `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign-key violation for an unknown marketer).
    pub async fn create(&self, input: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders
                 (marketer_id, device_name, device_model, number_of_devices, sold_amount, sale_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(input.marketer_id)
        .bind(&input.device_name)
        .bind(&input.device_model)
        .bind(input.number_of_devices)
        .bind(input.sold_amount)
        .bind(input.sale_date)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Move an order to a new status. Ownership never changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Totals over the orders matching the scope and filter.
    ///
    /// `scope` of `None` means all marketers (the MasterAdmin view). Zero
    /// matching orders is a valid result: the sums coalesce to zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn aggregate(
        &self,
        scope: Option<&[UserId]>,
        filter: &OrderFilter,
    ) -> Result<OrderTotals, RepositoryError> {
        let (total_revenue, total_orders, total_devices): (Decimal, i64, i64) =
            sqlx::query_as(&format!(
                "SELECT COALESCE(SUM(o.sold_amount), 0) AS total_revenue,
                        COUNT(*) AS total_orders,
                        COALESCE(SUM(o.number_of_devices), 0)::bigint AS total_devices
                 FROM orders o
                 WHERE {REPORT_PREDICATE}"
            ))
            .bind(scope.map(ids_as_i32))
            .bind(filter.status)
            .bind(filter.since())
            .bind(filter.until())
            .fetch_one(self.pool)
            .await?;

        Ok(OrderTotals {
            total_revenue,
            total_orders,
            total_devices,
        })
    }

    /// Report lines for the orders matching the scope and filter, ordered by
    /// sale date descending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_summaries(
        &self,
        scope: Option<&[UserId]>,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(&format!(
            "SELECT o.id, o.marketer_id, o.device_name, o.number_of_devices,
                    o.sold_amount, o.status, o.sale_date
             FROM orders o
             WHERE {REPORT_PREDICATE}
             ORDER BY o.sale_date DESC, o.id DESC"
        ))
        .bind(scope.map(ids_as_i32))
        .bind(filter.status)
        .bind(filter.since())
        .bind(filter.until())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

fn ids_as_i32(ids: &[UserId]) -> Vec<i32> {
    ids.iter().map(|id| id.as_i32()).collect()
}
