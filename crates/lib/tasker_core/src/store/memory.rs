//! In-process stores backed by `DashMap`.
//!
//! Email uniqueness is decided under the email index's entry lock, and task
//! toggles/deletes check ownership under the task's entry lock, so the same
//! guarantees hold as with the database constraints.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{StoreError, TaskStore, UserDirectory};
use crate::models::task::{NewTask, Task, TaskId};
use crate::models::user::{NewUser, User, UserId};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    tasks: DashMap<TaskId, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned_tasks(&self, owner: UserId, status: Option<bool>) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.user_id == owner && status.is_none_or(|c| t.completed == c))
            .map(|t| t.value().clone())
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        tasks
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let record = User {
                    id: Uuid::new_v4(),
                    name: user.name,
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: Utc::now(),
                };
                self.users.insert(record.id, record.clone());
                slot.insert(record.id);
                Ok(record)
            }
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        let id = *self.emails.get(email).ok_or(StoreError::NotFound)?;
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, StoreError> {
        self.users
            .get(&id)
            .map(|u| u.value().clone())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, StoreError> {
        Ok(self.owned_tasks(owner, None))
    }

    async fn list_by_owner_and_status(
        &self,
        owner: UserId,
        completed: bool,
    ) -> Result<Vec<Task>, StoreError> {
        Ok(self.owned_tasks(owner, Some(completed)))
    }

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        let record = Task {
            id: Uuid::now_v7(),
            user_id: task.user_id,
            title: task.title,
            completed: task.completed,
            created_at: Utc::now(),
        };
        self.tasks.insert(record.id, record.clone());
        Ok(record)
    }

    async fn toggle(&self, owner: UserId, id: TaskId) -> Result<Task, StoreError> {
        let mut task = self
            .tasks
            .get_mut(&id)
            .filter(|t| t.user_id == owner)
            .ok_or(StoreError::NotFound)?;
        task.completed = !task.completed;
        Ok(task.clone())
    }

    async fn delete(&self, owner: UserId, id: TaskId) -> Result<(), StoreError> {
        self.tasks
            .remove_if(&id, |_, t| t.user_id == owner)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
