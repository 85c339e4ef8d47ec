//! Request bodies and their validation.
//!
//! Bodies deserialize leniently (every field optional) so that a missing
//! field is reported with the same message as a blank one. Each `validate`
//! trims strings and returns the typed input the repositories accept.

use axum::extract::FromRequest;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use shopdesk_core::{BillboardId, CategoryId, ColorId, Price, PriceError, SizeId};

use crate::db::Reference;
use crate::error::AppError;

/// Longest accepted image URL, matching the `image.url` column check.
pub const MAX_IMAGE_URL_LENGTH: usize = 2048;

/// JSON body extractor that rejects malformed JSON with a 400 [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// A request body failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Label is required")]
    LabelRequired,
    #[error("Image URL is required")]
    ImageUrlRequired,
    #[error("Image URL is too long")]
    ImageUrlTooLong,
    #[error("Value is required")]
    ValueRequired,
    #[error("Billboard id is required")]
    BillboardIdRequired,
    #[error("Price is required")]
    PriceRequired,
    #[error("Price must be greater than 0")]
    PriceNotPositive,
    #[error("Price can have at most 2 decimal places")]
    PriceTooPrecise,
    #[error("Price must be less than 10000000000")]
    PriceTooLarge,
    #[error("Category id is required")]
    CategoryIdRequired,
    #[error("Size id is required")]
    SizeIdRequired,
    #[error("Color id is required")]
    ColorIdRequired,
    #[error("At least one image is required")]
    ImagesRequired,
    #[error("{0} does not exist in this store")]
    UnknownReference(Reference),
}

/// Trim a required string field.
fn required(value: Option<String>, missing: ValidationError) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(missing)
}

/// Parse a required id field. A present but unparsable id names no row.
fn required_id<T>(
    value: Option<String>,
    missing: ValidationError,
    reference: Reference,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    let raw = required(value, missing)?;
    parse(&raw).ok_or(ValidationError::UnknownReference(reference))
}

fn image_url(value: Option<String>) -> Result<String, ValidationError> {
    let url = required(value, ValidationError::ImageUrlRequired)?;
    if url.chars().count() > MAX_IMAGE_URL_LENGTH {
        return Err(ValidationError::ImageUrlTooLong);
    }
    Ok(url)
}

// =============================================================================
// Stores
// =============================================================================

/// Body of `POST /api/stores` and `PATCH /api/stores/{store_id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreForm {
    pub name: Option<String>,
}

/// Validated store fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInput {
    pub name: String,
}

impl StoreForm {
    /// Validate and trim.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NameRequired` if the name is missing or blank.
    pub fn validate(self) -> Result<StoreInput, ValidationError> {
        Ok(StoreInput {
            name: required(self.name, ValidationError::NameRequired)?,
        })
    }
}

// =============================================================================
// Billboards
// =============================================================================

/// Body of billboard create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardForm {
    pub label: Option<String>,
    pub image_url: Option<String>,
}

/// Validated billboard fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillboardInput {
    pub label: String,
    pub image_url: String,
}

impl BillboardForm {
    /// Validate and trim.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid field.
    pub fn validate(self) -> Result<BillboardInput, ValidationError> {
        Ok(BillboardInput {
            label: required(self.label, ValidationError::LabelRequired)?,
            image_url: image_url(self.image_url)?,
        })
    }
}

// =============================================================================
// Categories
// =============================================================================

/// Body of category create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    pub name: Option<String>,
    pub billboard_id: Option<String>,
}

/// Validated category fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub billboard_id: BillboardId,
}

impl CategoryForm {
    /// Validate and trim.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid field.
    pub fn validate(self) -> Result<CategoryInput, ValidationError> {
        Ok(CategoryInput {
            name: required(self.name, ValidationError::NameRequired)?,
            billboard_id: required_id(
                self.billboard_id,
                ValidationError::BillboardIdRequired,
                Reference::Billboard,
                BillboardId::parse,
            )?,
        })
    }
}

// =============================================================================
// Sizes and colors
// =============================================================================

/// Body of size/color create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeForm {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Validated size/color fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInput {
    pub name: String,
    pub value: String,
}

impl AttributeForm {
    /// Validate and trim.
    ///
    /// # Errors
    ///
    /// Returns the first missing field.
    pub fn validate(self) -> Result<AttributeInput, ValidationError> {
        Ok(AttributeInput {
            name: required(self.name, ValidationError::NameRequired)?,
            value: required(self.value, ValidationError::ValueRequired)?,
        })
    }
}

// =============================================================================
// Products
// =============================================================================

/// One image entry in a product body.
#[derive(Debug, Default, Deserialize)]
pub struct ImageForm {
    pub url: Option<String>,
}

/// Body of product create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: Option<String>,
    /// Accepts a JSON number or a decimal string.
    pub price: Option<Decimal>,
    pub category_id: Option<String>,
    pub size_id: Option<String>,
    pub color_id: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageForm>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
}

/// Validated product fields. `image_urls` keeps the request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    pub category_id: CategoryId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    pub is_featured: bool,
    pub is_archived: bool,
    pub image_urls: Vec<String>,
}

impl ProductForm {
    /// Validate and trim.
    ///
    /// # Errors
    ///
    /// Returns the first missing or invalid field.
    pub fn validate(self) -> Result<ProductInput, ValidationError> {
        let name = required(self.name, ValidationError::NameRequired)?;
        let price = self.price.ok_or(ValidationError::PriceRequired)?;
        let price = Price::new(price).map_err(|e| match e {
            PriceError::NotPositive => ValidationError::PriceNotPositive,
            PriceError::TooPrecise => ValidationError::PriceTooPrecise,
            PriceError::TooLarge => ValidationError::PriceTooLarge,
        })?;
        let category_id = required_id(
            self.category_id,
            ValidationError::CategoryIdRequired,
            Reference::Category,
            CategoryId::parse,
        )?;
        let size_id = required_id(
            self.size_id,
            ValidationError::SizeIdRequired,
            Reference::Size,
            SizeId::parse,
        )?;
        let color_id = required_id(
            self.color_id,
            ValidationError::ColorIdRequired,
            Reference::Color,
            ColorId::parse,
        )?;

        if self.images.is_empty() {
            return Err(ValidationError::ImagesRequired);
        }
        let image_urls = self
            .images
            .into_iter()
            .map(|image| image_url(image.url))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProductInput {
            name,
            price,
            category_id,
            size_id,
            color_id,
            is_featured: self.is_featured,
            is_archived: self.is_archived,
            image_urls,
        })
    }
}
