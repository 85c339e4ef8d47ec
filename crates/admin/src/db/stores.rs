//! Store repository.
//!
//! Every query except [`StoreRepository::owner_of`] and
//! [`StoreRepository::get`] is scoped by the owning user, so a caller can
//! never read or change another user's store through this type.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopdesk_core::{StoreId, UserId};

use super::RepositoryError;
use crate::guard::StoreOwnership;
use crate::models::Store;

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    name: String,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = RepositoryError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let user_id = UserId::parse(&row.user_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid store owner in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a store owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, owner: &UserId, name: &str) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO shopdesk.store (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// List the stores owned by `owner`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, user_id, created_at, updated_at
            FROM shopdesk.store
            WHERE user_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a store by id if it is owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_owner(
        &self,
        id: StoreId,
        owner: &UserId,
    ) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, user_id, created_at, updated_at
            FROM shopdesk.store
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a store by id regardless of owner.
    ///
    /// Only call this after the tenant guard has authorized the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, user_id, created_at, updated_at
            FROM shopdesk.store
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Rename a store owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store is owned by `owner`.
    pub async fn rename(
        &self,
        id: StoreId,
        owner: &UserId,
        name: &str,
    ) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            UPDATE shopdesk.store
            SET name = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, user_id, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a store owned by `owner` together with all of its resources.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store is owned by `owner`.
    pub async fn delete(&self, id: StoreId, owner: &UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shopdesk.store
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::from_delete)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl StoreOwnership for StoreRepository<'_> {
    async fn owner_of(&self, store: StoreId) -> Result<Option<UserId>, RepositoryError> {
        let owner: Option<String> =
            sqlx::query_scalar("SELECT user_id FROM shopdesk.store WHERE id = $1")
                .bind(store)
                .fetch_optional(self.pool)
                .await?;

        owner
            .map(|raw| {
                UserId::parse(&raw).map_err(|e| {
                    RepositoryError::DataCorruption(format!(
                        "invalid store owner in database: {e}"
                    ))
                })
            })
            .transpose()
    }
}
