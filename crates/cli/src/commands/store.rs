//! Store management commands.
//!
//! # Usage
//!
//! ```bash
//! shopdesk store create --owner user_2abc --name "Outlet"
//! ```

use shopdesk_admin::db::StoreRepository;
use shopdesk_core::{StoreId, UserId};

use super::{CliError, connect};

/// Create a store owned by `owner`.
///
/// # Returns
///
/// The ID of the created store.
///
/// # Errors
///
/// Returns an error if the owner or name is blank, or the insert fails.
pub async fn create(owner: &str, name: &str) -> Result<StoreId, CliError> {
    let owner = UserId::parse(owner).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::InvalidArgument("store name is blank".to_owned()));
    }

    let pool = connect().await?;
    let store = StoreRepository::new(&pool).create(&owner, name).await?;

    tracing::info!(
        "Store created successfully! ID: {}, Name: {}, Owner: {}",
        store.id,
        store.name,
        store.user_id
    );
    Ok(store.id)
}
