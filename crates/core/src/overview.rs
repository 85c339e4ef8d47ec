//! Monthly order and revenue aggregation for the store dashboard.
//!
//! The engine is a pure function over already-fetched rows: one
//! [`OverviewItem`] per order item, carrying the parent order's id and
//! creation time and the item's product price. It groups items by calendar
//! month, counts distinct orders per month, and sums revenue as [`Decimal`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{OrderId, format_currency};

/// One order item as seen by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewItem {
    /// The order the item belongs to.
    pub order_id: OrderId,
    /// When the parent order was created.
    pub placed_at: DateTime<Utc>,
    /// Unit price of the item's product (quantity is always one).
    pub price: Decimal,
}

/// Calendar month bucket. Orders by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Month of the year, 1-12.
    pub month: u32,
}

impl MonthKey {
    /// The month a timestamp falls in, using the timestamp's own calendar.
    #[must_use]
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

/// One row of the monthly time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// Calendar year.
    pub year: i32,
    /// Month of the year, 1-12.
    pub month: u32,
    /// Number of distinct orders with at least one item in this month.
    pub order_count: u64,
    /// Sum of item prices in this month.
    pub revenue: Decimal,
}

impl MonthlyRevenue {
    /// The bucket this row describes.
    #[must_use]
    pub const fn key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }

    /// Revenue formatted for display.
    #[must_use]
    pub fn revenue_display(&self) -> String {
        format_currency(self.revenue)
    }
}

/// Dashboard overview: the monthly series plus store-wide totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Months with at least one item, oldest first.
    pub months: Vec<MonthlyRevenue>,
    /// Every order of the store, including orders without items.
    pub total_orders: u64,
    /// Sum of all item prices.
    pub total_revenue: Decimal,
}

#[derive(Default)]
struct MonthAccumulator {
    orders: HashSet<OrderId>,
    revenue: Decimal,
}

/// Group order items by calendar month.
///
/// `total_orders` is the store's full order count; it is passed through
/// because orders without items never appear in `items`.
#[must_use]
pub fn monthly_overview<I>(items: I, total_orders: u64) -> Overview
where
    I: IntoIterator<Item = OverviewItem>,
{
    let mut buckets: HashMap<MonthKey, MonthAccumulator> = HashMap::new();
    let mut total_revenue = Decimal::ZERO;

    for item in items {
        let bucket = buckets.entry(MonthKey::of(&item.placed_at)).or_default();
        bucket.orders.insert(item.order_id);
        bucket.revenue += item.price;
        total_revenue += item.price;
    }

    let mut months: Vec<MonthlyRevenue> = buckets
        .into_iter()
        .map(|(key, bucket)| MonthlyRevenue {
            year: key.year,
            month: key.month,
            order_count: bucket.orders.len() as u64,
            revenue: bucket.revenue,
        })
        .collect();
    months.sort_unstable_by_key(MonthlyRevenue::key);

    Overview {
        months,
        total_orders,
        total_revenue,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn order(n: u128) -> OrderId {
        OrderId::new(Uuid::from_u128(n))
    }

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn item(order_id: OrderId, placed_at: DateTime<Utc>, price: Decimal) -> OverviewItem {
        OverviewItem {
            order_id,
            placed_at,
            price,
        }
    }

    #[test]
    fn test_groups_by_month_and_counts_orders_once() {
        let a = order(1);
        let b = order(2);
        let items = vec![
            item(a, at(2024, 1, 3), Decimal::new(10, 0)),
            item(a, at(2024, 1, 3), Decimal::new(5, 0)),
            item(b, at(2024, 2, 14), Decimal::new(20, 0)),
        ];

        let overview = monthly_overview(items, 2);

        assert_eq!(
            overview.months,
            vec![
                MonthlyRevenue {
                    year: 2024,
                    month: 1,
                    order_count: 1,
                    revenue: Decimal::new(15, 0),
                },
                MonthlyRevenue {
                    year: 2024,
                    month: 2,
                    order_count: 1,
                    revenue: Decimal::new(20, 0),
                },
            ]
        );
        assert_eq!(overview.total_revenue, Decimal::new(35, 0));
        assert_eq!(overview.total_orders, 2);
    }

    #[test]
    fn test_rows_are_chronological_not_insertion_ordered() {
        let items = vec![
            item(order(1), at(2024, 11, 1), Decimal::ONE),
            item(order(2), at(2023, 12, 31), Decimal::ONE),
            item(order(3), at(2024, 2, 1), Decimal::ONE),
            item(order(4), at(2024, 10, 5), Decimal::ONE),
        ];

        let keys: Vec<MonthKey> = monthly_overview(items, 4)
            .months
            .iter()
            .map(MonthlyRevenue::key)
            .collect();

        assert_eq!(
            keys,
            vec![
                MonthKey { year: 2023, month: 12 },
                MonthKey { year: 2024, month: 2 },
                MonthKey { year: 2024, month: 10 },
                MonthKey { year: 2024, month: 11 },
            ]
        );
    }

    #[test]
    fn test_same_month_different_years_are_separate() {
        let items = vec![
            item(order(1), at(2023, 5, 1), Decimal::ONE),
            item(order(2), at(2024, 5, 1), Decimal::ONE),
        ];

        let overview = monthly_overview(items, 2);
        assert_eq!(overview.months.len(), 2);
        assert_eq!(overview.months[0].year, 2023);
        assert_eq!(overview.months[1].year, 2024);
    }

    #[test]
    fn test_decimal_sum_is_exact() {
        // 0.1 + 0.2 is not 0.3 in binary floating point
        let items = vec![
            item(order(1), at(2024, 3, 1), Decimal::new(1, 1)),
            item(order(2), at(2024, 3, 2), Decimal::new(2, 1)),
        ];

        let overview = monthly_overview(items, 2);
        assert_eq!(overview.total_revenue, Decimal::new(3, 1));
        assert_eq!(overview.months[0].revenue, Decimal::new(3, 1));
        assert_eq!(overview.months[0].order_count, 2);
    }

    #[test]
    fn test_empty_store() {
        let overview = monthly_overview(Vec::new(), 0);
        assert!(overview.months.is_empty());
        assert_eq!(overview.total_orders, 0);
        assert_eq!(overview.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_orders_without_items_still_count_in_total() {
        let items = vec![item(order(1), at(2024, 6, 1), Decimal::new(42, 0))];

        let overview = monthly_overview(items, 3);
        assert_eq!(overview.total_orders, 3);
        assert_eq!(overview.months[0].order_count, 1);
    }

    #[test]
    fn test_month_boundary_uses_utc_calendar() {
        let last_instant = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let first_instant = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let items = vec![
            item(order(1), last_instant, Decimal::ONE),
            item(order(2), first_instant, Decimal::ONE),
        ];

        let overview = monthly_overview(items, 2);
        assert_eq!(overview.months[0].key(), MonthKey { year: 2024, month: 1 });
        assert_eq!(overview.months[1].key(), MonthKey { year: 2024, month: 2 });
    }

    #[test]
    fn test_revenue_display() {
        let row = MonthlyRevenue {
            year: 2024,
            month: 1,
            order_count: 1,
            revenue: Decimal::new(150_000, 2),
        };
        assert_eq!(row.revenue_display(), "$1,500.00");
    }
}
