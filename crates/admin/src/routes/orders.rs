//! Order route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::instrument;

use super::authorize_store;
use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::auth::OptionalUser;
use crate::models::OrderSummary;
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/{store_id}/orders", get(list))
}

/// List the store's orders, newest first. Owner only.
#[instrument(skip(state, user), fields(store_id = tracing::field::Empty))]
pub async fn list(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<OrderSummary>>, AppError> {
    let store = authorize_store(&state, user.as_ref(), &store_id).await?;
    Ok(Json(OrderRepository::new(state.pool()).list(store).await?))
}
