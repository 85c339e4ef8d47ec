//! Billboard route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use shopdesk_core::{BillboardId, StoreId};

use super::authorize_store;
use crate::db::BillboardRepository;
use crate::error::AppError;
use crate::forms::{BillboardForm, JsonBody};
use crate::middleware::auth::RequireUser;
use crate::models::Billboard;
use crate::state::AppState;

/// Build the billboards router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/billboards", get(list).post(create))
        .route(
            "/api/{store_id}/billboards/{billboard_id}",
            get(show).patch(update).delete(destroy),
        )
}

/// List a store's billboards, newest first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Billboard>>, AppError> {
    let Some(store) = StoreId::parse(&store_id) else {
        return Ok(Json(Vec::new()));
    };
    let billboards = BillboardRepository::new(state.pool()).list(store).await?;
    Ok(Json(billboards))
}

/// Get one billboard.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path((store_id, billboard_id)): Path<(String, String)>,
) -> Result<Json<Billboard>, AppError> {
    let (Some(store), Some(id)) = (StoreId::parse(&store_id), BillboardId::parse(&billboard_id))
    else {
        return Err(AppError::NotFound);
    };
    BillboardRepository::new(state.pool())
        .get(store, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Create a billboard.
#[instrument(skip(state, user, body), fields(store_id = tracing::field::Empty))]
pub async fn create(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    body: Result<JsonBody<BillboardForm>, AppError>,
) -> Result<(StatusCode, Json<Billboard>), AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let JsonBody(body) = body?;
    let input = body.validate()?;

    let billboard = BillboardRepository::new(state.pool())
        .create(store, &input)
        .await?;
    tracing::info!(billboard_id = %billboard.id, "Billboard created");
    Ok((StatusCode::CREATED, Json(billboard)))
}

/// Replace a billboard's fields.
#[instrument(skip(state, user, body), fields(store_id = tracing::field::Empty))]
pub async fn update(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, billboard_id)): Path<(String, String)>,
    body: Result<JsonBody<BillboardForm>, AppError>,
) -> Result<Json<Billboard>, AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let JsonBody(body) = body?;
    let input = body.validate()?;
    let id = BillboardId::parse(&billboard_id).ok_or(AppError::NotFound)?;

    let billboard = BillboardRepository::new(state.pool())
        .update(store, id, &input)
        .await?;
    Ok(Json(billboard))
}

/// Delete a billboard. Fails with 409 while a category uses it.
#[instrument(skip(state, user), fields(store_id = tracing::field::Empty))]
pub async fn destroy(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path((store_id, billboard_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let store = authorize_store(&state, Some(&user), &store_id).await?;
    let id = BillboardId::parse(&billboard_id).ok_or(AppError::NotFound)?;

    BillboardRepository::new(state.pool()).delete(store, id).await?;
    tracing::info!(billboard_id = %id, "Billboard deleted");
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
    async fn test_create_without_identity_is_unauthorized() {
        let body = json!({ "label": "Summer", "imageUrl": "https://cdn.test/a.png" });
        let response = send(json("POST", &format!("/api/{STORE}/billboards"), None, &body)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Unauthorized");
    }

    #[tokio::test]
    async fn test_create_with_bad_signature_is_unauthorized() {
        let request = Request::post(format!("/api/{STORE}/billboards"))
            .header("content-type", "application/json")
            .header("x-shopdesk-user", "alice")
            .header("x-shopdesk-signature", "00ff")
            .body(Body::from(json!({ "label": "Summer" }).to_string()))
            .unwrap();

        assert_eq!(send(request).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_checks_ownership_before_body() {
        let body = json!({ "label": "  ", "imageUrl": "https://cdn.test/a.png" });
        let response = send(json("POST", "/api/not-a-store/billboards", Some("alice"), &body)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Forbidden");
    }

    #[tokio::test]
    async fn test_update_checks_ownership_before_body() {
        let body = json!({ "label": "Summer" });
        let response = send(json(
            "PATCH",
            "/api/not-a-store/billboards/00000000-0000-0000-0000-000000000002",
            Some("alice"),
            &body,
        ))
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_malformed_json_for_foreign_store_is_forbidden() {
        let request = super::super::test_support::signed(
            Request::post("/api/not-a-store/billboards")
                .header("content-type", "application/json"),
            "alice",
        )
        .body(Body::from("{not json"))
        .unwrap();

        assert_eq!(send(request).await.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_delete_without_identity_is_unauthorized() {
        let request = Request::delete(format!(
            "/api/{STORE}/billboards/00000000-0000-0000-0000-000000000002"
        ))
        .body(Body::empty())
        .unwrap();

        assert_eq!(send(request).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_with_unparsable_store_is_empty() {
        let response = send(
            Request::get("/api/not-a-store/billboards")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "[]");
    }

    #[tokio::test]
    async fn test_get_with_unparsable_id_is_not_found() {
        let response = send(
            Request::get(format!("/api/{STORE}/billboards/nope"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
