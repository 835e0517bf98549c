//! # tasker_core
//!
//! Core domain logic for Tasker: credential hashing, access/refresh token
//! issuance and verification, the user and task store capabilities, and
//! the ownership guard that scopes task access to the calling user.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod store;
pub mod tasks;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
