//! Storage capabilities.
//!
//! The core depends only on the [`UserDirectory`] and [`TaskStore`] contracts.
//! [`PgStore`] backs them with PostgreSQL; [`MemoryStore`] keeps everything in
//! process for tests and database-less runs. Both enforce email uniqueness and
//! owner-scoped task mutation atomically at the storage boundary.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::task::{NewTask, Task, TaskId};
use crate::models::user::{NewUser, User, UserId};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Db(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            _ => StoreError::Db(e),
        }
    }
}

/// User records: create once, look up by email or id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Persist a new user and return it with its assigned id.
    ///
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken. Of any
    /// number of concurrent calls with the same email, at most one succeeds.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn get_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn get_by_id(&self, id: UserId) -> Result<User, StoreError>;
}

/// Task records, always addressed through their owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, StoreError>;

    /// Tasks owned by `owner` with the given status, oldest first.
    async fn list_by_owner_and_status(
        &self,
        owner: UserId,
        completed: bool,
    ) -> Result<Vec<Task>, StoreError>;

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Flip `completed` on task `id` if `owner` owns it.
    ///
    /// [`StoreError::NotFound`] covers both "absent" and "owned by someone else".
    async fn toggle(&self, owner: UserId, id: TaskId) -> Result<Task, StoreError>;

    /// Delete task `id` if `owner` owns it. Same not-found policy as `toggle`.
    async fn delete(&self, owner: UserId, id: TaskId) -> Result<(), StoreError>;
}
