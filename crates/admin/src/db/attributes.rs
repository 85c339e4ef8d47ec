//! Size and color repository.
//!
//! One implementation serves both tables; the [`AttributeKind`] type
//! parameter selects the table and the id type.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shopdesk_core::StoreId;

use super::RepositoryError;
use crate::forms::AttributeInput;
use crate::models::{Attribute, AttributeKind};

const COLUMNS: &str = "id, store_id, name, value, created_at, updated_at";

/// Internal row type shared by the size and color tables.
#[derive(Debug, sqlx::FromRow)]
struct AttributeRow {
    id: Uuid,
    store_id: StoreId,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AttributeRow {
    fn into_attribute<K: AttributeKind>(self) -> Attribute<K> {
        Attribute {
            id: K::Id::from(self.id),
            store_id: self.store_id,
            name: self.name,
            value: self.value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for size or color database operations.
pub struct AttributeRepository<'a, K> {
    pool: &'a PgPool,
    kind: PhantomData<K>,
}

impl<'a, K: AttributeKind> AttributeRepository<'a, K> {
    /// Create a new repository for attributes of kind `K`.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            kind: PhantomData,
        }
    }

    /// List a store's attributes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Attribute<K>>, RepositoryError> {
        let rows = sqlx::query_as::<_, AttributeRow>(&format!(
            "SELECT {COLUMNS} FROM {table}
             WHERE store_id = $1
             ORDER BY created_at DESC",
            table = K::TABLE
        ))
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AttributeRow::into_attribute).collect())
    }

    /// Get one attribute of a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: K::Id,
    ) -> Result<Option<Attribute<K>>, RepositoryError> {
        let row = sqlx::query_as::<_, AttributeRow>(&format!(
            "SELECT {COLUMNS} FROM {table}
             WHERE id = $1 AND store_id = $2",
            table = K::TABLE
        ))
        .bind(Into::<Uuid>::into(id))
        .bind(store)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(AttributeRow::into_attribute))
    }

    /// Create an attribute.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the store does not exist.
    pub async fn create(
        &self,
        store: StoreId,
        input: &AttributeInput,
    ) -> Result<Attribute<K>, RepositoryError> {
        let row = sqlx::query_as::<_, AttributeRow>(&format!(
            "INSERT INTO {table} (store_id, name, value)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}",
            table = K::TABLE
        ))
        .bind(store)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into_attribute())
    }

    /// Replace an attribute's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the attribute is not in the store.
    pub async fn update(
        &self,
        store: StoreId,
        id: K::Id,
        input: &AttributeInput,
    ) -> Result<Attribute<K>, RepositoryError> {
        let row = sqlx::query_as::<_, AttributeRow>(&format!(
            "UPDATE {table}
             SET name = $3, value = $4, updated_at = NOW()
             WHERE id = $1 AND store_id = $2
             RETURNING {COLUMNS}",
            table = K::TABLE
        ))
        .bind(Into::<Uuid>::into(id))
        .bind(store)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into_attribute())
    }

    /// Delete an attribute.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the attribute is not in the store,
    /// or `RepositoryError::Conflict` if a product still uses it.
    pub async fn delete(&self, store: StoreId, id: K::Id) -> Result<(), RepositoryError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {table} WHERE id = $1 AND store_id = $2",
            table = K::TABLE
        ))
        .bind(Into::<Uuid>::into(id))
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
