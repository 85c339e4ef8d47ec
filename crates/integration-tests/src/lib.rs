//! Integration tests for Shopdesk.
//!
//! These tests run against a real `PostgreSQL` database and are ignored by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! export SHOPDESK_TEST_DATABASE_URL=postgres://localhost/shopdesk_test
//! cargo test -p shopdesk-integration-tests -- --ignored
//! ```
//!
//! Every test creates its own store under a fresh owner id, so tests can run
//! in parallel against one database without cleaning up.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use shopdesk_admin::config::{AdminConfig, LogFormat};
use shopdesk_admin::db::{
    AttributeRepository, BillboardRepository, CategoryRepository, ProductRepository,
    StoreRepository,
};
use shopdesk_admin::forms::{AttributeInput, BillboardInput, CategoryInput, ProductInput};
use shopdesk_admin::middleware::auth::{SIGNATURE_HEADER, USER_HEADER};
use shopdesk_admin::models::{Color, ProductDetail, Size, Store};
use shopdesk_admin::state::AppState;
use shopdesk_core::{BillboardId, CategoryId, ColorId, Price, SizeId, UserId};

/// Identity secret shared by [`app`] and [`signed`].
pub const SECRET: &str = "integration-secret-0123456789abcdef";

/// Connect to `SHOPDESK_TEST_DATABASE_URL` and apply migrations.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("SHOPDESK_TEST_DATABASE_URL")
        .expect("SHOPDESK_TEST_DATABASE_URL must be set for integration tests");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("../admin/migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

/// A user id nobody else in the database has.
pub fn fresh_user() -> UserId {
    UserId::parse(&format!("user_{}", Uuid::new_v4().simple())).expect("non-blank user id")
}

/// The admin router over `pool`.
pub fn app(pool: PgPool) -> Router {
    let config = AdminConfig {
        database_url: SecretString::from("postgres://unused"),
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
    shopdesk_admin::routes::routes().with_state(AppState::new(config, pool))
}

/// Add identity headers for `user` to a request builder.
pub fn signed(builder: axum::http::request::Builder, user: &UserId) -> axum::http::request::Builder {
    let verifier = shopdesk_admin::middleware::IdentityVerifier::new(SecretString::from(SECRET));
    builder
        .header(USER_HEADER, user.as_str())
        .header(SIGNATURE_HEADER, verifier.sign(user))
}

/// Send one request through a fresh router.
pub async fn send(pool: &PgPool, request: Request<Body>) -> Response<Body> {
    app(pool.clone())
        .oneshot(request)
        .await
        .expect("router is infallible")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// A signed JSON request from `user`.
pub fn json_request(
    method: &str,
    uri: &str,
    user: &UserId,
    body: &serde_json::Value,
) -> Request<Body> {
    signed(Request::builder().method(method).uri(uri), user)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// An anonymous GET.
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("valid request")
}

/// A store with one of each catalog resource a product needs.
pub struct Fixture {
    pub owner: UserId,
    pub store: Store,
    pub billboard: BillboardId,
    pub category: CategoryId,
    pub size: SizeId,
    pub color: ColorId,
}

impl Fixture {
    pub async fn new(pool: &PgPool) -> Self {
        let owner = fresh_user();
        let store = StoreRepository::new(pool)
            .create(&owner, "Fixture Store")
            .await
            .expect("create store");
        let billboard = BillboardRepository::new(pool)
            .create(
                store.id,
                &BillboardInput {
                    label: "Fixture".to_owned(),
                    image_url: "https://img.example.com/fixture.jpg".to_owned(),
                },
            )
            .await
            .expect("create billboard")
            .id;
        let category = CategoryRepository::new(pool)
            .create(
                store.id,
                &CategoryInput {
                    name: "Shirts".to_owned(),
                    billboard_id: billboard,
                },
            )
            .await
            .expect("create category")
            .id;
        let size = AttributeRepository::<Size>::new(pool)
            .create(
                store.id,
                &AttributeInput {
                    name: "Medium".to_owned(),
                    value: "M".to_owned(),
                },
            )
            .await
            .expect("create size")
            .id;
        let color = AttributeRepository::<Color>::new(pool)
            .create(
                store.id,
                &AttributeInput {
                    name: "Black".to_owned(),
                    value: "#000000".to_owned(),
                },
            )
            .await
            .expect("create color")
            .id;

        Self {
            owner,
            store,
            billboard,
            category,
            size,
            color,
        }
    }

    /// Product fields pointing at this fixture's category, size and color.
    pub fn product_input(&self, name: &str, cents: i64, image_urls: &[&str]) -> ProductInput {
        ProductInput {
            name: name.to_owned(),
            price: Price::new(Decimal::new(cents, 2)).expect("positive price"),
            category_id: self.category,
            size_id: self.size,
            color_id: self.color,
            is_featured: false,
            is_archived: false,
            image_urls: image_urls.iter().map(|url| (*url).to_owned()).collect(),
        }
    }

    pub async fn create_product(&self, pool: &PgPool, input: &ProductInput) -> ProductDetail {
        ProductRepository::new(pool)
            .create(self.store.id, input)
            .await
            .expect("create product")
    }
}
