//! Tenant resource guard.
//!
//! Every write to a store's catalog, and every read of its orders or
//! dashboard, first proves that the caller owns the store. The guard does not
//! distinguish a missing store from a store owned by someone else.

use std::future::Future;

use thiserror::Error;

use shopdesk_core::{StoreId, UserId};

use crate::db::RepositoryError;

/// Looks up the owner of a store.
pub trait StoreOwnership {
    /// The owning user of `store`, or `None` if the store does not exist.
    fn owner_of(
        &self,
        store: StoreId,
    ) -> impl Future<Output = Result<Option<UserId>, RepositoryError>> + Send;
}

/// Reasons the guard refuses a request.
#[derive(Debug, Error)]
pub enum GuardError {
    /// No verified caller identity.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Caller does not own the store, or the store does not exist.
    #[error("forbidden")]
    Forbidden,

    /// Ownership lookup failed.
    #[error("ownership lookup failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// Verify that `caller` owns the store named by `raw_store_id`.
///
/// Returns the parsed store id on success and records it on the current span.
///
/// # Errors
///
/// - `GuardError::Unauthenticated` if there is no caller.
/// - `GuardError::Forbidden` if the id does not parse, the store does not
///   exist, or its owner is not the caller.
/// - `GuardError::Repository` if the lookup fails.
pub async fn authorize<L>(
    lookup: &L,
    caller: Option<&UserId>,
    raw_store_id: &str,
) -> Result<StoreId, GuardError>
where
    L: StoreOwnership + Sync,
{
    let caller = caller.ok_or(GuardError::Unauthenticated)?;
    let store_id = StoreId::parse(raw_store_id).ok_or(GuardError::Forbidden)?;

    match lookup.owner_of(store_id).await? {
        Some(owner) if owner == *caller => {
            tracing::Span::current().record("store_id", tracing::field::display(store_id));
            Ok(store_id)
        }
        _ => Err(GuardError::Forbidden),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use uuid::Uuid;

    use super::*;

    struct FakeStores {
        owners: HashMap<StoreId, UserId>,
        fail: bool,
    }

    impl FakeStores {
        fn with(store: StoreId, owner: &str) -> Self {
            Self {
                owners: HashMap::from([(store, UserId::parse(owner).unwrap())]),
                fail: false,
            }
        }
    }

    impl StoreOwnership for FakeStores {
        async fn owner_of(&self, store: StoreId) -> Result<Option<UserId>, RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(self.owners.get(&store).cloned())
        }
    }

    fn store(n: u128) -> StoreId {
        StoreId::new(Uuid::from_u128(n))
    }

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    #[tokio::test]
    async fn test_owner_is_authorized() {
        let stores = FakeStores::with(store(1), "alice");
        let result = authorize(&stores, Some(&user("alice")), &store(1).to_string()).await;
        assert_eq!(result.unwrap(), store(1));
    }

    #[tokio::test]
    async fn test_missing_caller_is_unauthenticated() {
        let stores = FakeStores::with(store(1), "alice");
        let result = authorize(&stores, None, &store(1).to_string()).await;
        assert!(matches!(result, Err(GuardError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden() {
        let stores = FakeStores::with(store(1), "alice");
        let result = authorize(&stores, Some(&user("bob")), &store(1).to_string()).await;
        assert!(matches!(result, Err(GuardError::Forbidden)));
    }

    #[tokio::test]
    async fn test_missing_store_is_forbidden_like_foreign_store() {
        let stores = FakeStores::with(store(1), "alice");
        let result = authorize(&stores, Some(&user("alice")), &store(2).to_string()).await;
        assert!(matches!(result, Err(GuardError::Forbidden)));
    }

    #[tokio::test]
    async fn test_unparsable_store_id_is_forbidden() {
        let stores = FakeStores::with(store(1), "alice");
        let result = authorize(&stores, Some(&user("alice")), "not-a-store").await;
        assert!(matches!(result, Err(GuardError::Forbidden)));
    }

    #[tokio::test]
    async fn test_owner_comparison_is_exact() {
        let stores = FakeStores::with(store(1), "Alice");
        let result = authorize(&stores, Some(&user("alice")), &store(1).to_string()).await;
        assert!(matches!(result, Err(GuardError::Forbidden)));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_reported() {
        let stores = FakeStores {
            owners: HashMap::new(),
            fail: true,
        };
        let result = authorize(&stores, Some(&user("alice")), &store(1).to_string()).await;
        assert!(matches!(result, Err(GuardError::Repository(_))));
    }
}
