//! Billboard domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopdesk_core::{BillboardId, StoreId};

/// A hero banner shown above a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Billboard {
    pub id: BillboardId,
    pub store_id: StoreId,
    pub label: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
