//! Task ownership guard.
//!
//! Every task read or write goes through [`TaskGuard`] with the caller's
//! [`Identity`]. The guard never accepts an owner from the caller: new tasks
//! are stamped with the identity, and toggles/deletes are scoped to it.

use std::sync::Arc;

use tracing::debug;

use crate::auth::Identity;
use crate::models::task::{NewTask, Task, TaskDraft, TaskId};
use crate::store::{StoreError, TaskStore};

/// Owner-scoped access to a [`TaskStore`].
#[derive(Clone)]
pub struct TaskGuard {
    store: Arc<dyn TaskStore>,
}

impl TaskGuard {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Tasks owned by `identity`, in creation order.
    pub async fn list(&self, identity: &Identity) -> Result<Vec<Task>, StoreError> {
        self.store.list_by_owner(identity.user_id()).await
    }

    /// Tasks owned by `identity` whose status equals `completed`.
    pub async fn list_by_status(
        &self,
        identity: &Identity,
        completed: bool,
    ) -> Result<Vec<Task>, StoreError> {
        self.store
            .list_by_owner_and_status(identity.user_id(), completed)
            .await
    }

    /// Create a task owned by `identity`.
    pub async fn create(&self, identity: &Identity, draft: TaskDraft) -> Result<Task, StoreError> {
        let task = self
            .store
            .insert(NewTask {
                user_id: identity.user_id(),
                title: draft.title,
                completed: draft.completed,
            })
            .await?;
        debug!(task_id = %task.id, user_id = %task.user_id, "task created");
        Ok(task)
    }

    /// Flip the status of `task_id`. `NotFound` unless `identity` owns it.
    pub async fn toggle(&self, identity: &Identity, task_id: TaskId) -> Result<Task, StoreError> {
        self.store.toggle(identity.user_id(), task_id).await
    }

    /// Delete `task_id`. `NotFound` unless `identity` owns it.
    pub async fn delete(&self, identity: &Identity, task_id: TaskId) -> Result<(), StoreError> {
        self.store.delete(identity.user_id(), task_id).await?;
        debug!(%task_id, user_id = %identity.user_id(), "task deleted");
        Ok(())
    }
}
