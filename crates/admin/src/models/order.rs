//! Order domain types.
//!
//! Orders are written by checkout; the admin API only reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use shopdesk_core::{OrderId, ProductId, format_currency};

/// One row of the admin order table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub phone: String,
    pub address: String,
    pub is_paid: bool,
    /// Product names of the order's items, joined with ", ".
    pub products: String,
    /// Sum of the item product prices.
    pub total_price: Decimal,
    pub total_price_display: String,
    pub created_at: DateTime<Utc>,
}

impl OrderSummary {
    pub(crate) fn new(
        id: OrderId,
        phone: String,
        address: String,
        is_paid: bool,
        product_names: &[String],
        total_price: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            phone,
            address,
            is_paid,
            products: product_names.join(", "),
            total_price,
            total_price_display: format_currency(total_price),
            created_at,
        }
    }
}

/// Input for recording an order (checkout and demo seeding).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub phone: String,
    pub address: String,
    pub is_paid: bool,
    /// One entry per purchased unit.
    pub product_ids: Vec<ProductId>,
}
