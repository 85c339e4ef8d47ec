//! Billboard repository.

use sqlx::PgPool;

use shopdesk_core::{BillboardId, StoreId};

use super::RepositoryError;
use crate::forms::BillboardInput;
use crate::models::Billboard;

const COLUMNS: &str = "id, store_id, label, image_url, created_at, updated_at";

/// Repository for billboard database operations.
pub struct BillboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BillboardRepository<'a> {
    /// Create a new billboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's billboards, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        let rows = sqlx::query_as::<_, Billboard>(&format!(
            "SELECT {COLUMNS} FROM shopdesk.billboard
             WHERE store_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get one billboard of a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let row = sqlx::query_as::<_, Billboard>(&format!(
            "SELECT {COLUMNS} FROM shopdesk.billboard
             WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Create a billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the store does not exist.
    pub async fn create(
        &self,
        store: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        sqlx::query_as::<_, Billboard>(&format!(
            "INSERT INTO shopdesk.billboard (store_id, label, image_url)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        ))
        .bind(store)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)
    }

    /// Replace a billboard's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the billboard is not in the store.
    pub async fn update(
        &self,
        store: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        sqlx::query_as::<_, Billboard>(&format!(
            "UPDATE shopdesk.billboard
             SET label = $3, image_url = $4, updated_at = NOW()
             WHERE id = $1 AND store_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(store)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the billboard is not in the store,
    /// or `RepositoryError::Conflict` if a category still uses it.
    pub async fn delete(&self, store: StoreId, id: BillboardId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shopdesk.billboard WHERE id = $1 AND store_id = $2")
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
