//! Core types for Shopdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod user;

pub use id::*;
pub use price::{Price, PriceError, format_currency};
pub use user::{UserId, UserIdError};
