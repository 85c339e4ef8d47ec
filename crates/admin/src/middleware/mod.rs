//! HTTP middleware for the admin API.
//!
//! # Layer Order (outermost first, see `main.rs`)
//!
//! 1. Sentry hub per request and HTTP transaction
//! 2. `TraceLayer` span with method, uri, user, status and latency
//! 3. Identity extractors ([`auth::RequireUser`], [`auth::OptionalUser`]),
//!    applied per handler

pub mod auth;

pub use auth::{IdentityVerifier, OptionalUser, RequireUser};
