//! Shopdesk admin API library.
//!
//! The multi-tenant store administration backend as a library, so that the
//! binary, the CLI and the integration tests share one implementation.
//!
//! # Security
//!
//! Every catalog write and every order/dashboard read is checked by
//! [`guard::authorize`] against the store's owner. Caller identity comes from
//! signed headers forwarded by the identity provider, see
//! [`middleware::auth`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod guard;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
