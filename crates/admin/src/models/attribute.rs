//! Size and color domain types.
//!
//! Sizes and colors share one shape (a name plus a display value) and one
//! repository. [`AttributeKind`] selects the table, id type and messages.

use std::fmt::{Debug, Display};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use shopdesk_core::{ColorId, SizeId, StoreId};

/// A kind of product attribute.
pub trait AttributeKind: Debug + Clone + Send + Sync + 'static {
    /// Typed id of rows of this kind.
    type Id: Debug + Display + Copy + Eq + Send + Sync + Serialize + From<Uuid> + Into<Uuid>;

    /// Fully qualified table name.
    const TABLE: &'static str;

    /// Path segment under `/api/{store_id}/`.
    const RESOURCE: &'static str;

    /// Human-readable name used in logs.
    const NAME: &'static str;

    /// Parse a raw path id into this kind's id type.
    fn parse_id(raw: &str) -> Option<Self::Id>;
}

/// Product size (e.g. "Small" / "S").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {}

impl AttributeKind for Size {
    type Id = SizeId;
    const TABLE: &'static str = "shopdesk.size";
    const RESOURCE: &'static str = "sizes";
    const NAME: &'static str = "size";

    fn parse_id(raw: &str) -> Option<SizeId> {
        SizeId::parse(raw)
    }
}

/// Product color (e.g. "Red" / "#ff0000").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {}

impl AttributeKind for Color {
    type Id = ColorId;
    const TABLE: &'static str = "shopdesk.color";
    const RESOURCE: &'static str = "colors";
    const NAME: &'static str = "color";

    fn parse_id(raw: &str) -> Option<ColorId> {
        ColorId::parse(raw)
    }
}

/// A size or color row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", bound(serialize = ""))]
pub struct Attribute<K: AttributeKind> {
    pub id: K::Id,
    pub store_id: StoreId,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_attribute_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let size = Attribute::<Size> {
            id: SizeId::new(Uuid::nil()),
            store_id: StoreId::new(Uuid::nil()),
            name: "Small".to_string(),
            value: "S".to_string(),
            created_at: at,
            updated_at: at,
        };

        let json = serde_json::to_value(&size).unwrap();
        assert_eq!(json["storeId"], Uuid::nil().to_string());
        assert_eq!(json["value"], "S");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_kinds_have_distinct_tables() {
        assert_ne!(Size::TABLE, Color::TABLE);
        assert_eq!(Size::RESOURCE, "sizes");
        assert_eq!(Color::RESOURCE, "colors");
        assert!(Color::parse_id("not-a-uuid").is_none());
    }
}
