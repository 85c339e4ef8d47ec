//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! shopdesk migrate
//! ```
//!
//! Migrations live in `crates/admin/migrations/` and are embedded at build
//! time:
//! ```text
//! migrations/
//! ├── 20260301000001_create_stores.sql
//! ├── 20260301000002_create_catalog.sql
//! └── 20260301000003_create_orders.sql
//! ```

use super::{CliError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
