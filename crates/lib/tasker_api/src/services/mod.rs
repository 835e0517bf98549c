//! Business services sitting between handlers and `tasker_core`.

pub mod auth;
