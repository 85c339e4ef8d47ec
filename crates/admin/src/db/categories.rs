//! Category repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopdesk_core::{BillboardId, CategoryId, StoreId};

use super::RepositoryError;
use crate::forms::CategoryInput;
use crate::models::{Billboard, Category, CategoryDetail};

const COLUMNS: &str = "id, store_id, billboard_id, name, created_at, updated_at";

const DETAIL_SELECT: &str = r"
    SELECT c.id, c.store_id, c.billboard_id, c.name, c.created_at, c.updated_at,
           b.label AS billboard_label,
           b.image_url AS billboard_image_url,
           b.created_at AS billboard_created_at,
           b.updated_at AS billboard_updated_at
    FROM shopdesk.category c
    JOIN shopdesk.billboard b ON b.store_id = c.store_id AND b.id = c.billboard_id
";

/// Internal row type for category reads joined with their billboard.
#[derive(Debug, sqlx::FromRow)]
struct CategoryDetailRow {
    id: CategoryId,
    store_id: StoreId,
    billboard_id: BillboardId,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    billboard_label: String,
    billboard_image_url: String,
    billboard_created_at: DateTime<Utc>,
    billboard_updated_at: DateTime<Utc>,
}

impl From<CategoryDetailRow> for CategoryDetail {
    fn from(row: CategoryDetailRow) -> Self {
        Self {
            billboard: Billboard {
                id: row.billboard_id,
                store_id: row.store_id,
                label: row.billboard_label,
                image_url: row.billboard_image_url,
                created_at: row.billboard_created_at,
                updated_at: row.billboard_updated_at,
            },
            category: Category {
                id: row.id,
                store_id: row.store_id,
                billboard_id: row.billboard_id,
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's categories with their billboards, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<CategoryDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE c.store_id = $1 ORDER BY c.created_at DESC"
        ))
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one category of a store with its billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE c.id = $1 AND c.store_id = $2"
        ))
        .bind(id)
        .bind(store)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the billboard is not in
    /// the store.
    pub async fn create(
        &self,
        store: StoreId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO shopdesk.category (store_id, billboard_id, name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        ))
        .bind(store)
        .bind(input.billboard_id)
        .bind(&input.name)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)
    }

    /// Replace a category's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category is not in the store,
    /// or `RepositoryError::InvalidReference` if the billboard is not.
    pub async fn update(
        &self,
        store: StoreId,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(&format!(
            "UPDATE shopdesk.category
             SET billboard_id = $3, name = $4, updated_at = NOW()
             WHERE id = $1 AND store_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .bind(input.billboard_id)
        .bind(&input.name)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category is not in the store,
    /// or `RepositoryError::Conflict` if a product still uses it.
    pub async fn delete(&self, store: StoreId, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shopdesk.category WHERE id = $1 AND store_id = $2")
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
