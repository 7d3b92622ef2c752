//! Order domain types and report aggregates.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use vistapro_core::{OrderId, OrderStatus, UserId};

/// A device sale recorded by a Marketer (domain type).
///
/// `marketer_id` is immutable after creation; reassigning the Marketer in the
/// hierarchy moves the order's visibility, never its ownership.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub marketer_id: UserId,
    pub device_name: String,
    pub device_model: String,
    pub number_of_devices: i32,
    pub sold_amount: Decimal,
    pub status: OrderStatus,
    pub sale_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a sale.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub marketer_id: UserId,
    pub device_name: String,
    pub device_model: String,
    pub number_of_devices: i32,
    pub sold_amount: Decimal,
    pub sale_date: DateTime<Utc>,
}

/// A single order line in a scoped report, ordered by sale date descending.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub marketer_id: UserId,
    pub device_name: String,
    pub number_of_devices: i32,
    pub sold_amount: Decimal,
    pub status: OrderStatus,
    pub sale_date: DateTime<Utc>,
}

/// Optional report filters.
///
/// The date range is inclusive on both ends and interpreted against
/// `sale_date` in UTC.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl OrderFilter {
    /// Lower bound of the `sale_date` window (inclusive).
    #[must_use]
    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.start
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Upper bound of the `sale_date` window (exclusive: midnight after the
    /// `end` date, so the whole end day is included).
    #[must_use]
    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.end
            .and_then(|d| d.succ_opt())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// Summary totals over the orders matching a scope and filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    /// Sum of `sold_amount` in exact decimal arithmetic.
    pub total_revenue: Decimal,
    /// Count of matching orders.
    pub total_orders: i64,
    /// Sum of `number_of_devices`.
    pub total_devices: i64,
}

impl OrderTotals {
    /// The valid empty aggregate: zero revenue over zero orders.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            total_orders: 0,
            total_devices: 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_totals() {
        let totals = OrderTotals::zero();
        assert_eq!(totals.total_revenue, Decimal::ZERO);
        assert_eq!(totals.total_orders, 0);
        assert_eq!(totals.total_devices, 0);
    }

    #[test]
    fn test_filter_window_inclusive_end_day() {
        let filter = OrderFilter {
            status: None,
            start: NaiveDate::from_ymd_opt(2026, 3, 1),
            end: NaiveDate::from_ymd_opt(2026, 3, 31),
        };

        let since = filter.since().unwrap();
        let until = filter.until().unwrap();
        assert_eq!(since.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        // Exclusive upper bound is the midnight after the end date
        assert_eq!(until.to_rfc3339(), "2026-04-01T00:00:00+00:00");
    }

    #[test]
    fn test_filter_window_open_ended() {
        let filter = OrderFilter::default();
        assert!(filter.since().is_none());
        assert!(filter.until().is_none());
    }
}
