//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                  - Liveness
//! GET    /health/ready                            - Readiness (database)
//!
//! # Stores (caller's own)
//! GET    /api/stores                              - List
//! POST   /api/stores                              - Create
//! GET    /api/stores/{store_id}                   - Get
//! PATCH  /api/stores/{store_id}                   - Rename
//! DELETE /api/stores/{store_id}                   - Delete with all resources
//!
//! # Catalog ({kind} = billboards | categories | sizes | colors | products)
//! GET    /api/{store_id}/{kind}                   - List (public)
//! POST   /api/{store_id}/{kind}                   - Create (owner)
//! GET    /api/{store_id}/{kind}/{id}              - Get (public)
//! PATCH  /api/{store_id}/{kind}/{id}              - Replace (owner)
//! DELETE /api/{store_id}/{kind}/{id}              - Delete (owner)
//!
//! # Orders and dashboard (owner)
//! GET    /api/{store_id}/orders                   - Order table
//! GET    /api/{store_id}/overview                 - Monthly revenue overview
//! ```
//!
//! Writes check, in order: caller identity (401), store ownership (403),
//! body (400), then persistence. A non-owner never learns whether a body
//! would have been valid.

pub mod attributes;
pub mod billboards;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod stores;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use shopdesk_core::{StoreId, UserId};

use crate::db::StoreRepository;
use crate::error::AppError;
use crate::guard;
use crate::models::{Color, Size};
use crate::state::AppState;

/// Build the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(stores::router())
        .merge(billboards::router())
        .merge(categories::router())
        .merge(attributes::router::<Size>())
        .merge(attributes::router::<Color>())
        .merge(products::router())
        .merge(orders::router())
        .merge(dashboard::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Require that `caller` owns the store named by `raw_store_id`.
async fn authorize_store(
    state: &AppState,
    caller: Option<&UserId>,
    raw_store_id: &str,
) -> Result<StoreId, AppError> {
    let stores = StoreRepository::new(state.pool());
    Ok(guard::authorize(&stores, caller, raw_store_id).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    //! Router test helpers. The pool connects lazily, so requests that are
    //! rejected before persistence never touch a database.

    use std::net::{IpAddr, Ipv4Addr};

    use axum::body::Body;
    use axum::http::{Request, Response};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use shopdesk_core::UserId;

    use crate::config::{AdminConfig, LogFormat};
    use crate::middleware::auth::{SIGNATURE_HEADER, USER_HEADER};
    use crate::state::AppState;

    pub const SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6";

    pub fn state() -> AppState {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost:1/unused"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3001,
            identity_secret: SecretString::from(SECRET),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        AppState::new(config, pool)
    }

    pub async fn send(request: Request<Body>) -> Response<Body> {
        super::routes()
            .with_state(state())
            .oneshot(request)
            .await
            .unwrap()
    }

    pub fn signed(builder: axum::http::request::Builder, user: &str) -> axum::http::request::Builder {
        let signature = state().identity().sign(&UserId::parse(user).unwrap());
        builder
            .header(USER_HEADER, user)
            .header(SIGNATURE_HEADER, signature)
    }

    pub fn json(method: &str, uri: &str, user: Option<&str>, body: &serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = signed(builder, user);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use super::test_support::{body_text, send};

    #[tokio::test]
    async fn test_health() {
        let response = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = send(Request::get("/nope").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
