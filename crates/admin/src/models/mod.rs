//! Domain models for the admin API.
//!
//! These are the validated shapes returned by repositories and serialized
//! to JSON with camelCase field names.

pub mod attribute;
pub mod billboard;
pub mod category;
pub mod order;
pub mod product;
pub mod store;

pub use attribute::{Attribute, AttributeKind, Color, Size};
pub use billboard::Billboard;
pub use category::{Category, CategoryDetail};
pub use order::{NewOrder, OrderSummary};
pub use product::{Image, Product, ProductDetail, ProductFilter};
pub use store::Store;
