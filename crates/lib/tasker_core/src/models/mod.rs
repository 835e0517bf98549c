//! Domain models.
//!
//! These are internal domain types, distinct from the API request/response
//! shapes in `tasker_api::models`.

pub mod auth;
pub mod task;
pub mod user;
