//! Task request handlers. All routes sit behind `require_auth`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use tasker_core::models::task::{Task, TaskDraft, TaskId};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateTaskRequest, DataResponse};

/// Parse a status path segment (`true`/`false`, `1`/`0`, `t`/`f`).
fn parse_completed(raw: &str) -> AppResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "Invalid completed status '{raw}'"
        ))),
    }
}

/// A malformed id cannot name any task, so it is reported like a missing one.
/// That includes a segment that does not even percent-decode.
fn parse_task_id(raw: Result<Path<String>, PathRejection>) -> AppResult<TaskId> {
    let not_found = || AppError::NotFound("Not found".into());
    let Path(raw) = raw.map_err(|_| not_found())?;
    TaskId::parse_str(&raw).map_err(|_| not_found())
}

/// `GET /tasks` — list the caller's tasks.
pub async fn list_tasks_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list(&identity).await?;
    Ok(Json(tasks))
}

/// `GET /tasks/status/{completed}` — list the caller's tasks with a status.
pub async fn list_tasks_by_status_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    completed: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Vec<Task>>> {
    let Path(completed) = completed?;
    let completed = parse_completed(&completed)?;
    let tasks = state.tasks.list_by_status(&identity, completed).await?;
    Ok(Json(tasks))
}

/// `POST /tasks` — create a task owned by the caller.
pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Task>>> {
    let Json(body) = body?;
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    let task = state
        .tasks
        .create(
            &identity,
            TaskDraft {
                title: title.to_string(),
                completed: body.completed,
            },
        )
        .await?;
    Ok(Json(DataResponse { data: task }))
}

/// `PATCH /tasks/{id}/toggle` — flip a task's completed status.
pub async fn toggle_task_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Task>> {
    let task = state.tasks.toggle(&identity, parse_task_id(id)?).await?;
    Ok(Json(task))
}

/// `DELETE /tasks/{id}` — delete a task.
pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(identity)): Extension<AuthenticatedUser>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<DataResponse<&'static str>>> {
    state.tasks.delete(&identity, parse_task_id(id)?).await?;
    Ok(Json(DataResponse {
        data: "Task deleted successfully",
    }))
}
