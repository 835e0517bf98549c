//! Task records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Task identifier (UUIDv7, time-sortable).
pub type TaskId = Uuid;

/// A task owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Owner. Set at creation, never changed.
    pub user_id: UserId,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied task contents. Carries no owner: the owner always comes
/// from the authenticated identity.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub completed: bool,
}

/// A task ready for insertion, owner already resolved.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: UserId,
    pub title: String,
    pub completed: bool,
}
