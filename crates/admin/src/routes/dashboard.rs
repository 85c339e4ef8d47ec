//! Dashboard overview handler.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use shopdesk_core::{MonthlyRevenue, Overview, format_currency};

use super::authorize_store;
use crate::db::{OrderRepository, StoreRepository};
use crate::error::AppError;
use crate::middleware::auth::OptionalUser;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/{store_id}/overview", get(overview))
}

/// One month of the overview, with display text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub order_count: u64,
    pub revenue: Decimal,
    pub revenue_display: String,
}

impl From<MonthlyRevenue> for MonthView {
    fn from(month: MonthlyRevenue) -> Self {
        Self {
            revenue_display: month.revenue_display(),
            year: month.year,
            month: month.month,
            order_count: month.order_count,
            revenue: month.revenue,
        }
    }
}

/// Response of `GET /api/{store_id}/overview`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewView {
    pub store_name: String,
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub total_revenue_display: String,
    pub months: Vec<MonthView>,
}

impl OverviewView {
    fn new(store_name: String, overview: Overview) -> Self {
        Self {
            store_name,
            total_orders: overview.total_orders,
            total_revenue_display: format_currency(overview.total_revenue),
            total_revenue: overview.total_revenue,
            months: overview.months.into_iter().map(MonthView::from).collect(),
        }
    }
}

/// Monthly order and revenue overview. Owner only.
#[instrument(skip(state, user), fields(store_id = tracing::field::Empty))]
pub async fn overview(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<OverviewView>, AppError> {
    let store_id = authorize_store(&state, user.as_ref(), &store_id).await?;

    let store = StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let overview = OrderRepository::new(state.pool())
        .overview(store_id)
        .await?;
    tracing::debug!(months = overview.months.len(), "Overview computed");

    Ok(Json(OverviewView::new(store.name, overview)))
}
