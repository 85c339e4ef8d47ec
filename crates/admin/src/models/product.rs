//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopdesk_core::{CategoryId, ColorId, ImageId, Price, ProductId, SizeId, StoreId};

use super::{Attribute, Category, Color, Size};

/// A product image. Images are ordered and owned by their product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
}

/// A catalog product with its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    pub name: String,
    /// Serialized as a decimal string.
    pub price: Price,
    pub is_featured: bool,
    pub is_archived: bool,
    pub images: Vec<Image>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product with its category, size and color embedded, as returned by reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
    pub size: Attribute<Size>,
    pub color: Attribute<Color>,
}

/// Optional filters for listing products. `None` leaves a column unfiltered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub size_id: Option<SizeId>,
    pub color_id: Option<ColorId>,
    pub is_featured: Option<bool>,
    pub is_archived: Option<bool>,
}
