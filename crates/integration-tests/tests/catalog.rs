//! Catalog persistence: products, images and referential integrity.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use shopdesk_admin::db::{
    AttributeRepository, BillboardRepository, CategoryRepository, ProductRepository,
    Reference, RepositoryError,
};
use shopdesk_admin::forms::MAX_IMAGE_URL_LENGTH;
use shopdesk_admin::models::{Color, ProductFilter, Size};
use shopdesk_integration_tests::{Fixture, body_json, send, signed, test_pool};

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_create_product_over_http_trims_and_keeps_image_order() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;

    let body = json!({
        "name": "  Linen Shirt ",
        "price": 49.5,
        "categoryId": fixture.category.to_string(),
        "sizeId": fixture.size.to_string(),
        "colorId": fixture.color.to_string(),
        "images": [
            { "url": "https://img.example.com/2.jpg" },
            { "url": "https://img.example.com/1.jpg" }
        ],
        "isFeatured": true
    });
    let request = signed(
        Request::post(format!("/api/{}/products", fixture.store.id)),
        &fixture.owner,
    )
    .header("content-type", "application/json")
    .body(Body::from(body.to_string()))
    .unwrap();
    let response = send(&pool, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_owned();

    let response = send(
        &pool,
        Request::get(format!("/api/{}/products/{id}", fixture.store.id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let product = body_json(response).await;
    assert_eq!(product["name"], "Linen Shirt");
    assert_eq!(product["isFeatured"], true);
    assert_eq!(product["isArchived"], false);
    assert_eq!(product["category"]["id"], fixture.category.to_string());
    assert_eq!(product["size"]["value"], "M");
    assert_eq!(product["color"]["value"], "#000000");
    let urls: Vec<&str> = product["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|image| image["url"].as_str().unwrap())
        .collect();
    assert_eq!(urls, ["https://img.example.com/2.jpg", "https://img.example.com/1.jpg"]);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_update_replaces_images() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;
    let product = fixture
        .create_product(
            &pool,
            &fixture.product_input("Tee", 2_000, &["https://img.example.com/a.jpg", "https://img.example.com/b.jpg"]),
        )
        .await;

    let updated = ProductRepository::new(&pool)
        .update(
            fixture.store.id,
            product.product.id,
            &fixture.product_input("Tee v2", 2_200, &["https://img.example.com/c.jpg"]),
        )
        .await
        .unwrap();

    assert_eq!(updated.product.name, "Tee v2");
    assert_eq!(updated.product.images.len(), 1);
    assert_eq!(updated.product.images[0].url, "https://img.example.com/c.jpg");
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_failed_image_insert_rolls_back_update() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;
    let product = fixture
        .create_product(&pool, &fixture.product_input("Tee", 2_000, &["https://img.example.com/a.jpg"]))
        .await;

    let too_long = format!("https://img.example.com/{}", "x".repeat(MAX_IMAGE_URL_LENGTH));
    let result = ProductRepository::new(&pool)
        .update(
            fixture.store.id,
            product.product.id,
            &fixture.product_input("Renamed", 2_500, &[too_long.as_str()]),
        )
        .await;
    assert!(matches!(result, Err(RepositoryError::Database(_))));

    let unchanged = ProductRepository::new(&pool)
        .get(fixture.store.id, product.product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.product.name, "Tee");
    assert_eq!(unchanged.product.images.len(), 1);
    assert_eq!(unchanged.product.images[0].url, "https://img.example.com/a.jpg");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_reads_never_mix_product_and_images_across_updates() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;
    let created = fixture
        .create_product(&pool, &fixture.product_input("A", 1_000, &["https://img.example.com/A.jpg"]))
        .await;
    let store = fixture.store.id;
    let id = created.product.id;

    let writer = {
        let pool = pool.clone();
        let a = fixture.product_input("A", 1_000, &["https://img.example.com/A.jpg"]);
        let b = fixture.product_input("B", 2_000, &["https://img.example.com/B.jpg"]);
        tokio::spawn(async move {
            let repo = ProductRepository::new(&pool);
            for round in 0..100 {
                let input = if round % 2 == 0 { &b } else { &a };
                repo.update(store, id, input).await.unwrap();
            }
        })
    };

    let repo = ProductRepository::new(&pool);
    for _ in 0..100 {
        let detail = repo.get(store, id).await.unwrap().unwrap();
        let urls: Vec<String> = detail.product.images.iter().map(|i| i.url.clone()).collect();
        assert_eq!(
            urls,
            [format!("https://img.example.com/{}.jpg", detail.product.name)],
            "product row and images come from different commits"
        );

        let listed = repo.list(store, &ProductFilter::default()).await.unwrap();
        for detail in listed {
            assert_eq!(detail.product.images.len(), 1);
            assert!(detail.product.images[0].url.ends_with(&format!("/{}.jpg", detail.product.name)));
        }
    }
    writer.await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_reference_to_other_store_is_rejected() {
    let pool = test_pool().await;
    let home = Fixture::new(&pool).await;
    let other = Fixture::new(&pool).await;

    let mut input = home.product_input("Tee", 1_000, &["https://img.example.com/a.jpg"]);
    input.color_id = other.color;
    let result = ProductRepository::new(&pool).create(home.store.id, &input).await;
    assert!(matches!(
        result,
        Err(RepositoryError::InvalidReference(Reference::Color))
    ));

    let products = ProductRepository::new(&pool)
        .list(home.store.id, &ProductFilter::default())
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_deleting_referenced_resources_conflicts() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;
    let product = fixture
        .create_product(&pool, &fixture.product_input("Tee", 1_000, &["https://img.example.com/a.jpg"]))
        .await;
    let store = fixture.store.id;

    let color = AttributeRepository::<Color>::new(&pool)
        .delete(store, fixture.color)
        .await;
    assert!(matches!(color, Err(RepositoryError::Conflict(_))));

    let size = AttributeRepository::<Size>::new(&pool)
        .delete(store, fixture.size)
        .await;
    assert!(matches!(size, Err(RepositoryError::Conflict(_))));

    let category = CategoryRepository::new(&pool)
        .delete(store, fixture.category)
        .await;
    assert!(matches!(category, Err(RepositoryError::Conflict(_))));

    let billboard = BillboardRepository::new(&pool)
        .delete(store, fixture.billboard)
        .await;
    assert!(matches!(billboard, Err(RepositoryError::Conflict(_))));

    assert!(
        AttributeRepository::<Color>::new(&pool)
            .get(store, fixture.color)
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        BillboardRepository::new(&pool)
            .get(store, fixture.billboard)
            .await
            .unwrap()
            .is_some()
    );

    let after = ProductRepository::new(&pool)
        .get(store, product.product.id)
        .await
        .unwrap()
        .expect("product survives refused deletes");
    assert_eq!(after.product.name, "Tee");
    assert_eq!(after.product.category_id, fixture.category);
    assert_eq!(after.product.size_id, fixture.size);
    assert_eq!(after.product.color_id, fixture.color);
    assert_eq!(after.category.billboard_id, fixture.billboard);
    assert_eq!(after.product.updated_at, product.product.updated_at);
    let urls: Vec<&str> = after.product.images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, ["https://img.example.com/a.jpg"]);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_delete_conflict_maps_to_409_over_http() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;
    fixture
        .create_product(&pool, &fixture.product_input("Tee", 1_000, &["https://img.example.com/a.jpg"]))
        .await;

    let response = send(
        &pool,
        signed(
            Request::delete(format!("/api/{}/sizes/{}", fixture.store.id, fixture.size)),
            &fixture.owner,
        )
        .body(Body::empty())
        .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_list_filters_featured_and_archived() {
    let pool = test_pool().await;
    let fixture = Fixture::new(&pool).await;

    let mut featured = fixture.product_input("Featured", 1_000, &["https://img.example.com/f.jpg"]);
    featured.is_featured = true;
    fixture.create_product(&pool, &featured).await;

    let mut archived = fixture.product_input("Archived", 1_000, &["https://img.example.com/r.jpg"]);
    archived.is_archived = true;
    fixture.create_product(&pool, &archived).await;

    fixture
        .create_product(&pool, &fixture.product_input("Plain", 1_000, &["https://img.example.com/p.jpg"]))
        .await;

    let repo = ProductRepository::new(&pool);
    let all = repo
        .list(fixture.store.id, &ProductFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].product.name, "Plain");

    let only_featured = repo
        .list(
            fixture.store.id,
            &ProductFilter {
                is_featured: Some(true),
                ..ProductFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(only_featured.len(), 1);
    assert_eq!(only_featured[0].product.name, "Featured");

    let response = send(
        &pool,
        Request::get(format!(
            "/api/{}/products?isArchived=false&categoryId={}",
            fixture.store.id, fixture.category
        ))
        .body(Body::empty())
        .unwrap(),
    )
    .await;
    let listed = body_json(response).await;
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Plain", "Featured"]);
}
