//! CLI subcommands.
//!
//! # Environment Variables
//!
//! - `SHOPDESK_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `SHOPDESK_IDENTITY_SECRET` - Key shared with the identity provider

pub mod identity;
pub mod migrate;
pub mod seed;
pub mod store;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use shopdesk_admin::db::{self, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid command argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Read a required environment variable as a secret.
fn secret_env(name: &'static str) -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
        .ok_or(CliError::MissingEnvVar(name))
}

/// Connect to the database named by `SHOPDESK_DATABASE_URL` or `DATABASE_URL`.
async fn connect() -> Result<PgPool, CliError> {
    let database_url = secret_env("SHOPDESK_DATABASE_URL")
        .or_else(|_| secret_env("DATABASE_URL"))
        .map_err(|_| CliError::MissingEnvVar("SHOPDESK_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}
