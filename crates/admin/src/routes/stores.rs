//! Store route handlers.
//!
//! Stores are scoped to the caller: another user's store answers 404, the
//! same as a store that does not exist.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use shopdesk_core::StoreId;

use crate::db::StoreRepository;
use crate::error::AppError;
use crate::forms::{JsonBody, StoreForm};
use crate::middleware::auth::RequireUser;
use crate::models::Store;
use crate::state::AppState;

/// Build the stores router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stores", get(list).post(create))
        .route(
            "/api/stores/{store_id}",
            get(show).patch(rename).delete(destroy),
        )
}

/// List the caller's stores, oldest first.
#[instrument(skip(state, user))]
pub async fn list(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Store>>, AppError> {
    Ok(Json(
        StoreRepository::new(state.pool())
            .list_for_owner(&user)
            .await?,
    ))
}

/// Create a store owned by the caller.
#[instrument(skip(state, user, body))]
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<StoreForm>,
) -> Result<(StatusCode, Json<Store>), AppError> {
    let input = body.validate()?;

    let store = StoreRepository::new(state.pool())
        .create(&user, &input.name)
        .await?;
    tracing::info!(store_id = %store.id, "Store created");
    Ok((StatusCode::CREATED, Json(store)))
}

/// Get one of the caller's stores.
#[instrument(skip(state, user))]
pub async fn show(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Store>, AppError> {
    let id = StoreId::parse(&store_id).ok_or(AppError::NotFound)?;
    StoreRepository::new(state.pool())
        .get_for_owner(id, &user)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Rename one of the caller's stores.
///
/// A store the caller does not own answers 404 before the body is looked at.
#[instrument(skip(state, user, body))]
pub async fn rename(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    body: Result<JsonBody<StoreForm>, AppError>,
) -> Result<Json<Store>, AppError> {
    let id = StoreId::parse(&store_id).ok_or(AppError::NotFound)?;
    let stores = StoreRepository::new(state.pool());
    stores
        .get_for_owner(id, &user)
        .await?
        .ok_or(AppError::NotFound)?;

    let JsonBody(body) = body?;
    let input = body.validate()?;
    let store = stores.rename(id, &user, &input.name).await?;
    Ok(Json(store))
}

/// Delete one of the caller's stores and everything it owns.
#[instrument(skip(state, user))]
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = StoreId::parse(&store_id).ok_or(AppError::NotFound)?;

    StoreRepository::new(state.pool()).delete(id, &user).await?;
    tracing::info!(store_id = %id, "Store deleted");
    Ok(StatusCode::NO_CONTENT)
}
