//! PostgreSQL-backed stores.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{StoreError, TaskStore, UserDirectory};
use crate::models::task::{NewTask, Task, TaskId};
use crate::models::user::{NewUser, User, UserId};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";
const TASK_COLUMNS: &str = "id, user_id, title, completed, created_at";

/// User directory and task store over a shared connection pool.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        // The UNIQUE constraint on `email` decides races; a violation maps to
        // `DuplicateEmail` via `From<sqlx::Error>`.
        let row = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        debug!(user_id = %row.id, "user created");
        Ok(row)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_owner_and_status(
        &self,
        owner: UserId,
        completed: bool,
    ) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 AND completed = $2 \
             ORDER BY created_at, id"
        ))
        .bind(owner)
        .bind(completed)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        let row = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, user_id, title, completed) VALUES ($1, $2, $3, $4) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(task.user_id)
        .bind(&task.title)
        .bind(task.completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn toggle(&self, owner: UserId, id: TaskId) -> Result<Task, StoreError> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET completed = NOT completed WHERE id = $1 AND user_id = $2 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, owner: UserId, id: TaskId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
