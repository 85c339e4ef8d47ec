//! Order listing and the dashboard overview.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;

use shopdesk_admin::db::OrderRepository;
use shopdesk_admin::models::NewOrder;
use shopdesk_integration_tests::{Fixture, body_json, fresh_user, send, signed, test_pool};

fn decimal(value: &serde_json::Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_orders_list_joins_names_and_sums_prices() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;
    let tee = fixture
        .create_product(&pool, &fixture.product_input("Tee", 2_000, &["https://img.example.com/t.jpg"]))
        .await;
    let cap = fixture
        .create_product(&pool, &fixture.product_input("Cap", 1_250, &["https://img.example.com/c.jpg"]))
        .await;

    let orders = OrderRepository::new(&pool);
    orders
        .create(
            fixture.store.id,
            &NewOrder {
                phone: "555-0101".to_owned(),
                address: "2 Elm St".to_owned(),
                is_paid: true,
                product_ids: vec![tee.product.id, cap.product.id],
            },
        )
        .await
        .unwrap();
    orders
        .create(
            fixture.store.id,
            &NewOrder {
                phone: String::new(),
                address: String::new(),
                is_paid: false,
                product_ids: Vec::new(),
            },
        )
        .await
        .unwrap();

    let summaries = orders.list(fixture.store.id).await.unwrap();
    assert_eq!(summaries.len(), 2);

    let empty = &summaries[0];
    assert_eq!(empty.products, "");
    assert_eq!(empty.total_price, Decimal::ZERO);

    let paid = &summaries[1];
    assert_eq!(paid.products, "Tee, Cap");
    assert_eq!(paid.total_price, Decimal::new(3_250, 2));
    assert!(paid.is_paid);

    assert_eq!(orders.count(fixture.store.id).await.unwrap(), 2);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_product_names_follow_item_order() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;
    let tee = fixture
        .create_product(&pool, &fixture.product_input("Tee", 2_000, &["https://img.example.com/t.jpg"]))
        .await;
    let cap = fixture
        .create_product(&pool, &fixture.product_input("Cap", 1_250, &["https://img.example.com/c.jpg"]))
        .await;

    let orders = OrderRepository::new(&pool);
    orders
        .create(
            fixture.store.id,
            &NewOrder {
                phone: "555-0103".to_owned(),
                address: "4 Pine St".to_owned(),
                is_paid: false,
                product_ids: vec![cap.product.id, tee.product.id, cap.product.id],
            },
        )
        .await
        .unwrap();

    let summaries = orders.list(fixture.store.id).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].products, "Cap, Tee, Cap");
    assert_eq!(summaries[0].total_price, Decimal::new(4_500, 2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_overview_counts_and_items_agree_under_concurrent_orders() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;
    let tee = fixture
        .create_product(&pool, &fixture.product_input("Tee", 2_000, &["https://img.example.com/t.jpg"]))
        .await;
    let store = fixture.store.id;

    let writer = {
        let pool = pool.clone();
        let product = tee.product.id;
        tokio::spawn(async move {
            let orders = OrderRepository::new(&pool);
            for _ in 0..50 {
                orders
                    .create(
                        store,
                        &NewOrder {
                            phone: "555-0104".to_owned(),
                            address: "5 Birch St".to_owned(),
                            is_paid: true,
                            product_ids: vec![product],
                        },
                    )
                    .await
                    .unwrap();
            }
        })
    };

    // Every order has exactly one item, so a consistent read counts each
    // order once in both places.
    let orders = OrderRepository::new(&pool);
    for _ in 0..50 {
        let overview = orders.overview(store).await.unwrap();
        let with_items: u64 = overview.months.iter().map(|m| m.order_count).sum();
        assert_eq!(overview.total_orders, with_items);
        assert_eq!(
            overview.total_revenue,
            Decimal::new(2_000, 2) * Decimal::from(overview.total_orders)
        );
    }
    writer.await.unwrap();

    let overview = orders.overview(store).await.unwrap();
    assert_eq!(overview.total_orders, 50);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_overview_groups_revenue_by_month() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;
    let tee = fixture
        .create_product(&pool, &fixture.product_input("Tee", 2_000, &["https://img.example.com/t.jpg"]))
        .await;

    let orders = OrderRepository::new(&pool);
    for (placed_at, items) in [
        ("2026-01-15T12:00:00Z", 1),
        ("2026-01-20T12:00:00Z", 2),
        ("2026-03-02T12:00:00Z", 1),
    ] {
        let id = orders
            .create(
                fixture.store.id,
                &NewOrder {
                    phone: "555-0102".to_owned(),
                    address: "3 Oak St".to_owned(),
                    is_paid: true,
                    product_ids: vec![tee.product.id; items],
                },
            )
            .await
            .unwrap();
        sqlx::query("UPDATE shopdesk.customer_order SET created_at = $2::timestamptz WHERE id = $1")
            .bind(id)
            .bind(placed_at)
            .execute(&pool)
            .await
            .unwrap();
    }

    let response = send(
        &pool,
        signed(
            Request::get(format!("/api/{}/overview", fixture.store.id)),
            &fixture.owner,
        )
        .body(Body::empty())
        .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let overview = body_json(response).await;
    assert_eq!(overview["storeName"], "Fixture Store");
    assert_eq!(overview["totalOrders"], 3);
    assert_eq!(decimal(&overview["totalRevenue"]), Decimal::new(8_000, 2));

    let months = overview["months"].as_array().unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["year"], 2026);
    assert_eq!(months[0]["month"], 1);
    assert_eq!(months[0]["orderCount"], 2);
    assert_eq!(decimal(&months[0]["revenue"]), Decimal::new(6_000, 2));
    assert_eq!(months[1]["month"], 3);
    assert_eq!(months[1]["orderCount"], 1);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_orders_require_the_owner() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;

    let response = send(
        &pool,
        signed(
            Request::get(format!("/api/{}/orders", fixture.store.id)),
            &fresh_user(),
        )
        .body(Body::empty())
        .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
