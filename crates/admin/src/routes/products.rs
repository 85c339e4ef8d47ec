//! Product route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use shopdesk_core::{CategoryId, ColorId, ProductId, SizeId, StoreId};

use super::authorize_store;
use crate::db::ProductRepository;
use crate::error::AppError;
use crate::forms::{JsonBody, ProductForm};
use crate::middleware::auth::RequireUser;
use crate::models::{ProductDetail, ProductFilter};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/products", get(list).post(create))
        .route(
            "/api/{store_id}/products/{product_id}",
            get(show).patch(update).delete(destroy),
        )
}

/// Query string of the product list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category_id: Option<String>,
    pub size_id: Option<String>,
    pub color_id: Option<String>,
    pub is_featured: Option<String>,
    pub is_archived: Option<String>,
}

/// Outcome of parsing one id filter.
enum IdFilter<T> {
    Any,
    Only(T),
    Nothing,
}

fn id_filter<T>(raw: Option<&str>, parse: impl FnOnce(&str) -> Option<T>) -> IdFilter<T> {
    match raw.map(str::trim) {
        None | Some("") => IdFilter::Any,
        Some(raw) => parse(raw).map_or(IdFilter::Nothing, IdFilter::Only),
    }
}

fn flag_filter(raw: Option<&str>) -> Option<bool> {
    raw.map(|value| value == "true")
}

impl ProductQuery {
    /// Convert to a repository filter.
    ///
    /// Returns `None` when an id filter does not parse, since no product can
    /// match it.
    #[must_use]
    pub fn into_filter(self) -> Option<ProductFilter> {
        let mut filter = ProductFilter {
            is_featured: flag_filter(self.is_featured.as_deref()),
            is_archived: flag_filter(self.is_archived.as_deref()),
            ..ProductFilter::default()
        };

        match id_filter(self.category_id.as_deref(), CategoryId::parse) {
            IdFilter::Any => {}
            IdFilter::Only(id) => filter.category_id = Some(id),
            IdFilter::Nothing => return None,
        }
        match id_filter(self.size_id.as_deref(), SizeId::parse) {
            IdFilter::Any => {}
            IdFilter::Only(id) => filter.size_id = Some(id),
            IdFilter::Nothing => return None,
        }
        match id_filter(self.color_id.as_deref(), ColorId::parse) {
            IdFilter::Any => {}
            IdFilter::Only(id) => filter.color_id = Some(id),
            IdFilter::Nothing => return None,
        }

        Some(filter)
    }
}

/// List a store's products, newest first, optionally filtered.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductDetail>>, AppError> {
    let (Some(store), Some(filter)) = (StoreId::parse(&store_id), query.into_filter()) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(
        ProductRepository::new(state.pool())
            .list(store, &filter)
            .await?,
    ))
}

/// Get one product with its images, category, size and color.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(String, String)>,
) -> Result<Json<ProductDetail>, AppError> {
    let (Some(store), Some(id)) = (StoreId::parse(&store_id), ProductId::parse(&product_id))
    else {
        return Err(AppError::NotFound);
    };
    ProductRepository::new(state.pool())
        .get(store, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Create a product with its images.
#[instrument(skip(state, user, body), fields(store_id = tracing::field::Empty))]
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    body: Result<JsonBody<ProductForm>, AppError>,
) -> Result<(StatusCode, Json<ProductDetail>), AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let JsonBody(body) = body?;
    let input = body.validate()?;

    let product = ProductRepository::new(state.pool())
        .create(store, &input)
        .await?;
    tracing::info!(
        product_id = %product.product.id,
        images = product.product.images.len(),
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's fields and images atomically.
#[instrument(skip(state, user, body), fields(store_id = tracing::field::Empty))]
pub async fn update(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(String, String)>,
    body: Result<JsonBody<ProductForm>, AppError>,
) -> Result<Json<ProductDetail>, AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let JsonBody(body) = body?;
    let input = body.validate()?;
    let id = ProductId::parse(&product_id).ok_or(AppError::NotFound)?;

    let product = ProductRepository::new(state.pool())
        .update(store, id, &input)
        .await?;
    Ok(Json(product))
}

/// Delete a product and its images. Fails with 409 while an order references it.
#[instrument(skip(state, user), fields(store_id = tracing::field::Empty))]
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let id = ProductId::parse(&product_id).ok_or(AppError::NotFound)?;

    ProductRepository::new(state.pool()).delete(store, id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
