//! Seed a demo store.
//!
//! Creates one store owned by the given user with billboards, categories,
//! sizes, colors, products and a few months of orders, so the dashboard
//! overview has data to show.
//!
//! ```bash
//! shopdesk seed --owner user_2abc
//! ```

use chrono::{Months, Utc};
use rust_decimal::Decimal;

use shopdesk_admin::db::{
    AttributeRepository, BillboardRepository, CategoryRepository, OrderRepository,
    ProductRepository, StoreRepository,
};
use shopdesk_admin::forms::{AttributeInput, BillboardInput, CategoryInput, ProductInput};
use shopdesk_admin::models::{Color, NewOrder, Size};
use shopdesk_core::{Price, ProductId, StoreId, UserId};

use super::{CliError, connect};

const SIZES: [(&str, &str); 3] = [("Small", "S"), ("Medium", "M"), ("Large", "L")];
const COLORS: [(&str, &str); 2] = [("Black", "#000000"), ("White", "#ffffff")];

/// (name, price in cents, category index, featured)
const PRODUCTS: [(&str, i64, usize, bool); 4] = [
    ("Classic Tee", 2_500, 0, true),
    ("Heavy Hoodie", 6_000, 1, true),
    ("Pocket Tee", 2_800, 0, false),
    ("Zip Hoodie", 7_200, 1, false),
];

fn invalid(message: &str) -> CliError {
    CliError::InvalidArgument(message.to_owned())
}

/// Create the demo store and return its id.
///
/// # Errors
///
/// Returns an error if the owner id is blank or any insert fails.
pub async fn demo_store(owner: &str) -> Result<StoreId, CliError> {
    let owner = UserId::parse(owner).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let pool = connect().await?;

    let store = StoreRepository::new(&pool)
        .create(&owner, "Demo Outlet")
        .await?;
    tracing::info!("Created store {}", store.id);

    let billboards = BillboardRepository::new(&pool);
    let mut categories = Vec::new();
    for (label, name) in [("Summer Tees", "Tees"), ("Winter Layers", "Hoodies")] {
        let billboard = billboards
            .create(
                store.id,
                &BillboardInput {
                    label: label.to_owned(),
                    image_url: format!(
                        "https://images.example.com/billboards/{}.jpg",
                        name.to_lowercase()
                    ),
                },
            )
            .await?;
        let category = CategoryRepository::new(&pool)
            .create(
                store.id,
                &CategoryInput {
                    name: name.to_owned(),
                    billboard_id: billboard.id,
                },
            )
            .await?;
        categories.push(category.id);
    }

    let mut sizes = Vec::new();
    for (name, value) in SIZES {
        let size = AttributeRepository::<Size>::new(&pool)
            .create(
                store.id,
                &AttributeInput {
                    name: name.to_owned(),
                    value: value.to_owned(),
                },
            )
            .await?;
        sizes.push(size.id);
    }

    let mut colors = Vec::new();
    for (name, value) in COLORS {
        let color = AttributeRepository::<Color>::new(&pool)
            .create(
                store.id,
                &AttributeInput {
                    name: name.to_owned(),
                    value: value.to_owned(),
                },
            )
            .await?;
        colors.push(color.id);
    }

    let products = ProductRepository::new(&pool);
    let mut product_ids: Vec<ProductId> = Vec::new();
    for (i, (name, cents, category, featured)) in PRODUCTS.into_iter().enumerate() {
        let price = Price::new(Decimal::new(cents, 2))
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        let slug = name.to_lowercase().replace(' ', "-");
        let input = ProductInput {
            name: name.to_owned(),
            price,
            category_id: *categories.get(category).ok_or_else(|| invalid("category"))?,
            size_id: *sizes.get(i % sizes.len()).ok_or_else(|| invalid("size"))?,
            color_id: *colors.get(i % colors.len()).ok_or_else(|| invalid("color"))?,
            is_featured: featured,
            is_archived: false,
            image_urls: vec![
                format!("https://images.example.com/products/{slug}-front.jpg"),
                format!("https://images.example.com/products/{slug}-back.jpg"),
            ],
        };
        let product = products.create(store.id, &input).await?;
        product_ids.push(product.product.id);
    }

    let orders = OrderRepository::new(&pool);
    let now = Utc::now();
    for (months_ago, is_paid, items) in [
        (2_u32, true, vec![0_usize, 1]),
        (1, true, vec![2]),
        (1, false, vec![1, 3]),
        (0, true, vec![0, 0, 3]),
    ] {
        let product_ids = items
            .into_iter()
            .map(|i| product_ids.get(i).copied().ok_or_else(|| invalid("product")))
            .collect::<Result<Vec<_>, _>>()?;
        let order_id = orders
            .create(
                store.id,
                &NewOrder {
                    phone: "555-0100".to_owned(),
                    address: "1 Main St, Springfield".to_owned(),
                    is_paid,
                    product_ids,
                },
            )
            .await?;

        let placed_at = now
            .checked_sub_months(Months::new(months_ago))
            .unwrap_or(now);
        sqlx::query("UPDATE shopdesk.customer_order SET created_at = $2 WHERE id = $1")
            .bind(order_id)
            .bind(placed_at)
            .execute(&pool)
            .await?;
    }

    tracing::info!(
        "Demo store seeded! ID: {}, Products: {}, Owner: {}",
        store.id,
        product_ids.len(),
        owner
    );
    Ok(store.id)
}
