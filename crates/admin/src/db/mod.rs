//! Database operations for the Shopdesk admin API.
//!
//! # Schema: `shopdesk`
//!
//! ## Tables
//!
//! - `store` - Tenants, owned by an identity-provider user id
//! - `billboard` - Hero banners referenced by categories
//! - `category` - Product categories, each pointing at a billboard
//! - `size`, `color` - Product attributes (name + value)
//! - `product` - Catalog entries with a decimal price
//! - `image` - Ordered product images, replaced wholesale on update
//! - `customer_order`, `order_item` - Checkout output, read-only here
//!
//! Every child row carries `store_id` and cross-resource references are
//! composite `(store_id, id)` foreign keys, so a row can never point into
//! another store.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p shopdesk-cli -- migrate
//! ```

pub mod attributes;
pub mod billboards;
pub mod categories;
pub mod orders;
pub mod products;
pub mod stores;

use std::fmt;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::error::ErrorKind;
use sqlx::{PgPool, Postgres, Transaction};
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use attributes::AttributeRepository;
pub use billboards::BillboardRepository;
pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use stores::StoreRepository;

/// The resource a foreign key points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Store,
    Billboard,
    Category,
    Size,
    Color,
    Product,
    Order,
    Unknown,
}

impl Reference {
    /// Resolve the referenced resource from a foreign key constraint name.
    fn from_constraint(constraint: Option<&str>) -> Self {
        match constraint {
            Some("category_billboard_fkey") => Self::Billboard,
            Some("product_category_fkey") => Self::Category,
            Some("product_size_fkey") => Self::Size,
            Some("product_color_fkey") => Self::Color,
            Some("order_item_product_fkey" | "image_product_id_fkey") => Self::Product,
            Some("order_item_order_fkey") => Self::Order,
            Some(name) if name.ends_with("_store_id_fkey") => Self::Store,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Store => "Store",
            Self::Billboard => "Billboard",
            Self::Category => "Category",
            Self::Size => "Size",
            Self::Color => "Color",
            Self::Product => "Product",
            Self::Order => "Order",
            Self::Unknown => "Referenced resource",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A written row references a row that does not exist in the same store.
    #[error("{0} does not exist in this store")]
    InvalidReference(Reference),

    /// The row is still referenced by other rows.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify an error from an INSERT or UPDATE.
    ///
    /// Foreign key violations become [`RepositoryError::InvalidReference`].
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.kind() == ErrorKind::ForeignKeyViolation
        {
            return Self::InvalidReference(Reference::from_constraint(db_err.constraint()));
        }
        Self::Database(err)
    }

    /// Classify an error from a DELETE.
    ///
    /// Foreign key violations become [`RepositoryError::Conflict`].
    pub(crate) fn from_delete(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.kind() == ErrorKind::ForeignKeyViolation
        {
            return Self::Conflict(
                db_err
                    .constraint()
                    .map_or_else(|| db_err.message().to_owned(), str::to_owned),
            );
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Begin a read-only transaction in which every statement sees the same
/// snapshot.
///
/// Reads that span several statements (a product and its images, the
/// overview items and the order count) run inside one so a concurrent
/// commit is seen by all of them or by none.
///
/// # Errors
///
/// Returns `sqlx::Error` if no connection is available or the isolation
/// level cannot be set.
pub(crate) async fn begin_snapshot(
    pool: &PgPool,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Convert a row count into the unsigned count the API reports.
pub(crate) fn count_to_u64(count: i64) -> Result<u64, RepositoryError> {
    u64::try_from(count)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative row count: {count}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_from_constraint() {
        assert_eq!(
            Reference::from_constraint(Some("product_size_fkey")),
            Reference::Size
        );
        assert_eq!(
            Reference::from_constraint(Some("category_billboard_fkey")),
            Reference::Billboard
        );
        assert_eq!(
            Reference::from_constraint(Some("billboard_store_id_fkey")),
            Reference::Store
        );
        assert_eq!(Reference::from_constraint(None), Reference::Unknown);
    }

    #[test]
    fn test_invalid_reference_message() {
        let err = RepositoryError::InvalidReference(Reference::Color);
        assert_eq!(err.to_string(), "Color does not exist in this store");
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        assert!(matches!(
            RepositoryError::from_write(sqlx::Error::RowNotFound),
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
        assert!(matches!(
            RepositoryError::from_delete(sqlx::Error::PoolTimedOut),
            RepositoryError::Database(sqlx::Error::PoolTimedOut)
        ));
    }

    #[test]
    fn test_count_to_u64() {
        assert_eq!(count_to_u64(7).ok(), Some(7));
        assert!(matches!(
            count_to_u64(-1),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
