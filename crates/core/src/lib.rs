//! Shopdesk Core - Shared types library.
//!
//! This crate provides common types used across all Shopdesk components:
//! - `admin` - The multi-tenant store administration API
//! - `cli` - Command-line tools for migrations, seeding and identity tokens
//!
//! # Architecture
//!
//! The core crate contains only types and pure computation - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, caller identities and prices
//! - [`overview`] - Monthly order/revenue aggregation for the store dashboard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod overview;
pub mod types;

pub use overview::{MonthKey, MonthlyRevenue, Overview, OverviewItem, monthly_overview};
pub use types::*;
