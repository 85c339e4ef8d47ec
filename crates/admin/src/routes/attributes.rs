//! Size and color route handlers.
//!
//! Handlers are generic over [`AttributeKind`]; [`router`] mounts one set
//! per kind under `/api/{store_id}/sizes` and `/api/{store_id}/colors`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use shopdesk_core::StoreId;

use super::authorize_store;
use crate::db::AttributeRepository;
use crate::error::AppError;
use crate::forms::{AttributeForm, JsonBody};
use crate::middleware::auth::RequireUser;
use crate::models::{Attribute, AttributeKind};
use crate::state::AppState;

/// Build the router for one attribute kind.
pub fn router<K: AttributeKind>() -> Router<AppState> {
    let collection = format!("/api/{{store_id}}/{}", K::RESOURCE);
    let member = format!("{collection}/{{attribute_id}}");

    Router::new()
        .route(&collection, get(list::<K>).post(create::<K>))
        .route(
            &member,
            get(show::<K>).patch(update::<K>).delete(destroy::<K>),
        )
}

/// List a store's sizes or colors, newest first.
#[instrument(skip(state), fields(kind = K::NAME))]
pub async fn list<K: AttributeKind>(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Attribute<K>>>, AppError> {
    let Some(store) = StoreId::parse(&store_id) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(
        AttributeRepository::<K>::new(state.pool()).list(store).await?,
    ))
}

/// Get one size or color.
#[instrument(skip(state), fields(kind = K::NAME))]
pub async fn show<K: AttributeKind>(
    State(state): State<AppState>,
    Path((store_id, attribute_id)): Path<(String, String)>,
) -> Result<Json<Attribute<K>>, AppError> {
    let (Some(store), Some(id)) = (StoreId::parse(&store_id), K::parse_id(&attribute_id)) else {
        return Err(AppError::NotFound);
    };
    AttributeRepository::<K>::new(state.pool())
        .get(store, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Create a size or color.
#[instrument(
    skip(state, user, body),
    fields(kind = K::NAME, store_id = tracing::field::Empty)
)]
pub async fn create<K: AttributeKind>(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    body: Result<JsonBody<AttributeForm>, AppError>,
) -> Result<(StatusCode, Json<Attribute<K>>), AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let JsonBody(body) = body?;
    let input = body.validate()?;

    let attribute = AttributeRepository::<K>::new(state.pool())
        .create(store, &input)
        .await?;
    tracing::info!(id = %attribute.id, "Attribute created");
    Ok((StatusCode::CREATED, Json(attribute)))
}

/// Replace a size's or color's fields.
#[instrument(
    skip(state, user, body),
    fields(kind = K::NAME, store_id = tracing::field::Empty)
)]
pub async fn update<K: AttributeKind>(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, attribute_id)): Path<(String, String)>,
    body: Result<JsonBody<AttributeForm>, AppError>,
) -> Result<Json<Attribute<K>>, AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let JsonBody(body) = body?;
    let input = body.validate()?;
    let id = K::parse_id(&attribute_id).ok_or(AppError::NotFound)?;

    let attribute = AttributeRepository::<K>::new(state.pool())
        .update(store, id, &input)
        .await?;
    Ok(Json(attribute))
}

/// Delete a size or color. Fails with 409 while a product uses it.
#[instrument(
    skip(state, user),
    fields(kind = K::NAME, store_id = tracing::field::Empty)
)]
pub async fn destroy<K: AttributeKind>(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, attribute_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let id = K::parse_id(&attribute_id).ok_or(AppError::NotFound)?;

    AttributeRepository::<K>::new(state.pool())
        .delete(store, id)
        .await?;
    tracing::info!(%id, "Attribute deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use super::super::test_support::{body_text, json, send};

    const STORE: &str = "00000000-0000-0000-0000-000000000001";

    #[tokio::test]
    async fn test_empty_size_for_foreign_store_is_forbidden() {
        let response = send(json("POST", "/api/not-a-store/sizes", Some("alice"), &json!({}))).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Forbidden");
    }

    #[tokio::test]
    async fn test_color_update_checks_ownership_before_body() {
        let response = send(json(
            "PATCH",
            "/api/not-a-store/colors/00000000-0000-0000-0000-000000000009",
            Some("alice"),
            &json!({ "value": "#ff0000" }),
        ))
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_size_without_identity_is_unauthorized() {
        let response = send(json("POST", &format!("/api/{STORE}/sizes"), None, &json!({}))).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_color_delete_requires_identity() {
        let request = Request::delete(format!(
            "/api/{STORE}/colors/00000000-0000-0000-0000-000000000009"
        ))
        .body(Body::empty())
        .unwrap();

        assert_eq!(send(request).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_size_get_with_unparsable_id_is_not_found() {
        let response = send(
            Request::get(format!("/api/{STORE}/sizes/xyz"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
