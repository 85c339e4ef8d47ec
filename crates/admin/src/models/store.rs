//! Store (tenant) domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopdesk_core::{StoreId, UserId};

/// A store owned by one user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    /// Identity-provider user id of the owner.
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
