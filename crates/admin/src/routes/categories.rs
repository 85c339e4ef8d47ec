//! Category route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use shopdesk_core::{CategoryId, StoreId};

use super::authorize_store;
use crate::db::CategoryRepository;
use crate::error::AppError;
use crate::forms::{CategoryForm, JsonBody};
use crate::middleware::auth::RequireUser;
use crate::models::{Category, CategoryDetail};
use crate::state::AppState;

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/categories", get(list).post(create))
        .route(
            "/api/{store_id}/categories/{category_id}",
            get(show).patch(update).delete(destroy),
        )
}

/// List a store's categories with their billboards.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<CategoryDetail>>, AppError> {
    let Some(store) = StoreId::parse(&store_id) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(CategoryRepository::new(state.pool()).list(store).await?))
}

/// Get one category with its billboard.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(String, String)>,
) -> Result<Json<CategoryDetail>, AppError> {
    let (Some(store), Some(id)) = (StoreId::parse(&store_id), CategoryId::parse(&category_id))
    else {
        return Err(AppError::NotFound);
    };
    CategoryRepository::new(state.pool())
        .get(store, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Create a category under one of the store's billboards.
#[instrument(skip(state, user, body), fields(store_id = tracing::field::Empty))]
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    body: Result<JsonBody<CategoryForm>, AppError>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let JsonBody(body) = body?;
    let input = body.validate()?;

    let category = CategoryRepository::new(state.pool())
        .create(store, &input)
        .await?;
    tracing::info!(category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace a category's fields.
#[instrument(skip(state, user, body), fields(store_id = tracing::field::Empty))]
pub async fn update(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(String, String)>,
    body: Result<JsonBody<CategoryForm>, AppError>,
) -> Result<Json<Category>, AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let JsonBody(body) = body?;
    let input = body.validate()?;
    let id = CategoryId::parse(&category_id).ok_or(AppError::NotFound)?;

    let category = CategoryRepository::new(state.pool())
        .update(store, id, &input)
        .await?;
    Ok(Json(category))
}

/// Delete a category. Fails with 409 while a product uses it.
#[instrument(skip(state, user), fields(store_id = tracing::field::Empty))]
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let id = CategoryId::parse(&category_id).ok_or(AppError::NotFound)?;

    CategoryRepository::new(state.pool()).delete(store, id).await?;
    tracing::info!(category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::test_support::{body_text, json, send};

    const STORE: &str = "00000000-0000-0000-0000-000000000001";

    #[tokio::test]
    async fn test_create_requires_identity_first() {
        let response = send(json(
            "POST",
            &format!("/api/{STORE}/categories"),
            None,
            &json!({}),
        ))
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_body_for_foreign_store_is_forbidden() {
        let body = json!({ "billboardId": "00000000-0000-0000-0000-000000000002" });
        let response = send(json("POST", "/api/not-a-store/categories", Some("alice"), &body)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Forbidden");
    }

    #[tokio::test]
    async fn test_empty_update_for_foreign_store_is_forbidden() {
        let response = send(json(
            "PATCH",
            "/api/not-a-store/categories/00000000-0000-0000-0000-000000000003",
            Some("alice"),
            &json!({}),
        ))
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
