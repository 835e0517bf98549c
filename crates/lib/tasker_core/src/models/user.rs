//! User records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Stable user identifier, assigned by the store on creation.
pub type UserId = Uuid;

/// A registered user.
///
/// Never mutated after creation. `password_hash` is the bcrypt string, never
/// the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A user about to be created. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
