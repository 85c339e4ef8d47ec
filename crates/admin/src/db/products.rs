//! Product repository.
//!
//! A product and its images change together: create and update run in one
//! transaction, and an update replaces the whole image list. Readers see
//! either the old product with its old images or the new one with its new
//! images.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use shopdesk_core::{BillboardId, CategoryId, ColorId, Price, ProductId, SizeId, StoreId};

use super::{RepositoryError, begin_snapshot};
use crate::forms::ProductInput;
use crate::models::{Attribute, Category, Image, Product, ProductDetail, ProductFilter};

const DETAIL_SELECT: &str = r"
    SELECT p.id, p.store_id, p.category_id, p.size_id, p.color_id, p.name, p.price,
           p.is_featured, p.is_archived, p.created_at, p.updated_at,
           c.billboard_id AS category_billboard_id,
           c.name AS category_name,
           c.created_at AS category_created_at,
           c.updated_at AS category_updated_at,
           s.name AS size_name,
           s.value AS size_value,
           s.created_at AS size_created_at,
           s.updated_at AS size_updated_at,
           co.name AS color_name,
           co.value AS color_value,
           co.created_at AS color_created_at,
           co.updated_at AS color_updated_at
    FROM shopdesk.product p
    JOIN shopdesk.category c ON c.store_id = p.store_id AND c.id = p.category_id
    JOIN shopdesk.size s ON s.store_id = p.store_id AND s.id = p.size_id
    JOIN shopdesk.color co ON co.store_id = p.store_id AND co.id = p.color_id
";

/// Internal row type for product reads joined with category, size and color.
#[derive(Debug, sqlx::FromRow)]
struct ProductDetailRow {
    id: ProductId,
    store_id: StoreId,
    category_id: CategoryId,
    size_id: SizeId,
    color_id: ColorId,
    name: String,
    price: Price,
    is_featured: bool,
    is_archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_billboard_id: BillboardId,
    category_name: String,
    category_created_at: DateTime<Utc>,
    category_updated_at: DateTime<Utc>,
    size_name: String,
    size_value: String,
    size_created_at: DateTime<Utc>,
    size_updated_at: DateTime<Utc>,
    color_name: String,
    color_value: String,
    color_created_at: DateTime<Utc>,
    color_updated_at: DateTime<Utc>,
}

impl ProductDetailRow {
    fn into_detail(self, images: Vec<Image>) -> ProductDetail {
        ProductDetail {
            category: Category {
                id: self.category_id,
                store_id: self.store_id,
                billboard_id: self.category_billboard_id,
                name: self.category_name,
                created_at: self.category_created_at,
                updated_at: self.category_updated_at,
            },
            size: Attribute {
                id: self.size_id,
                store_id: self.store_id,
                name: self.size_name,
                value: self.size_value,
                created_at: self.size_created_at,
                updated_at: self.size_updated_at,
            },
            color: Attribute {
                id: self.color_id,
                store_id: self.store_id,
                name: self.color_name,
                value: self.color_value,
                created_at: self.color_created_at,
                updated_at: self.color_updated_at,
            },
            product: Product {
                id: self.id,
                store_id: self.store_id,
                category_id: self.category_id,
                size_id: self.size_id,
                color_id: self.color_id,
                name: self.name,
                price: self.price,
                is_featured: self.is_featured,
                is_archived: self.is_archived,
                images,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

/// Images of the given products, grouped by product in position order.
async fn fetch_images<'e>(
    executor: impl PgExecutor<'e>,
    products: &[ProductId],
) -> Result<HashMap<ProductId, Vec<Image>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, Image>(
        r"
        SELECT id, product_id, url
        FROM shopdesk.image
        WHERE product_id = ANY($1)
        ORDER BY product_id, position
        ",
    )
    .bind(products)
    .fetch_all(executor)
    .await?;

    let mut grouped: HashMap<ProductId, Vec<Image>> = HashMap::new();
    for image in rows {
        grouped.entry(image.product_id).or_default().push(image);
    }
    Ok(grouped)
}

/// Insert a product's images, keeping the order of `urls`.
async fn insert_images<'e>(
    executor: impl PgExecutor<'e>,
    product: ProductId,
    urls: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO shopdesk.image (product_id, url, position)
        SELECT $1, t.url, (t.ord - 1)::int
        FROM UNNEST($2::text[]) WITH ORDINALITY AS t(url, ord)
        ",
    )
    .bind(product)
    .bind(urls)
    .execute(executor)
    .await?;

    Ok(())
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's products matching `filter`, newest first.
    ///
    /// Products and images are read from one snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        store: StoreId,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let mut tx = begin_snapshot(self.pool).await?;
        let rows = sqlx::query_as::<_, ProductDetailRow>(&format!(
            "{DETAIL_SELECT}
             WHERE p.store_id = $1
               AND ($2::uuid IS NULL OR p.category_id = $2)
               AND ($3::uuid IS NULL OR p.size_id = $3)
               AND ($4::uuid IS NULL OR p.color_id = $4)
               AND ($5::boolean IS NULL OR p.is_featured = $5)
               AND ($6::boolean IS NULL OR p.is_archived = $6)
             ORDER BY p.created_at DESC"
        ))
        .bind(store)
        .bind(filter.category_id)
        .bind(filter.size_id)
        .bind(filter.color_id)
        .bind(filter.is_featured)
        .bind(filter.is_archived)
        .fetch_all(&mut *tx)
        .await?;

        let ids: Vec<ProductId> = rows.iter().map(|row| row.id).collect();
        let mut images = fetch_images(&mut *tx, &ids).await?;
        tx.commit().await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let product_images = images.remove(&row.id).unwrap_or_default();
                row.into_detail(product_images)
            })
            .collect())
    }

    /// Get one product of a store with its images and relations.
    ///
    /// The product row and its images come from one snapshot, so a
    /// concurrent update is seen entirely or not at all.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let mut tx = begin_snapshot(self.pool).await?;
        let row = sqlx::query_as::<_, ProductDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE p.id = $1 AND p.store_id = $2"
        ))
        .bind(id)
        .bind(store)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut images = fetch_images(&mut *tx, &[id]).await?;
        tx.commit().await?;
        Ok(Some(row.into_detail(images.remove(&id).unwrap_or_default())))
    }

    /// Create a product and its images in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the category, size or
    /// color is not in the store. Nothing is written on error.
    pub async fn create(
        &self,
        store: StoreId,
        input: &ProductInput,
    ) -> Result<ProductDetail, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id: ProductId = sqlx::query_scalar(
            r"
            INSERT INTO shopdesk.product
                (store_id, category_id, size_id, color_id, name, price, is_featured, is_archived)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(store)
        .bind(input.category_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(&input.name)
        .bind(input.price.amount())
        .bind(input.is_featured)
        .bind(input.is_archived)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        insert_images(&mut *tx, id, &input.image_urls).await?;

        tx.commit().await?;

        self.get(store, id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Replace a product's fields and images in one transaction.
    ///
    /// The product row is updated, its existing images deleted and the new
    /// images inserted. If any step fails the transaction is rolled back and
    /// the product keeps its previous fields and images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the store,
    /// `RepositoryError::InvalidReference` if the category, size or color is
    /// not, or `RepositoryError::Database` if any statement fails.
    pub async fn update(
        &self,
        store: StoreId,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<ProductDetail, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r"
            UPDATE shopdesk.product
            SET category_id = $3, size_id = $4, color_id = $5, name = $6, price = $7,
                is_featured = $8, is_archived = $9, updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            ",
        )
        .bind(id)
        .bind(store)
        .bind(input.category_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(&input.name)
        .bind(input.price.amount())
        .bind(input.is_featured)
        .bind(input.is_archived)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM shopdesk.image WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_images(&mut *tx, id, &input.image_urls).await?;

        tx.commit().await?;

        self.get(store, id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product and its images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the store,
    /// or `RepositoryError::Conflict` if an order item still references it.
    pub async fn delete(&self, store: StoreId, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shopdesk.product WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::from_delete)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
