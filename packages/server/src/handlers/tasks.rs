use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::task::{TaskAbstract, TaskDetail};
use crate::services::tasks;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/tasks",
    tag = "Tasks",
    operation_id = "listTasks",
    summary = "List tasks",
    description = "Returns every task ordered by name with its maximum score and submission limit. Callers on a team also get their team's score and submission count.",
    responses(
        (status = 200, description = "Task list", body = Vec<TaskAbstract>),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_tasks(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskAbstract>>, AppError> {
    let views = tasks::list_task_views(&state, auth_user.as_ref()).await?;
    Ok(Json(views))
}

#[utoipa::path(
    get,
    path = "/tasks/{name}",
    tag = "Tasks",
    operation_id = "getTask",
    summary = "Get task detail",
    description = "Returns the task statement and its subtask breakdown. Callers on a team also get per-subtask best scores.",
    params(("name" = String, Path, description = "Task name")),
    responses(
        (status = 200, description = "Task detail", body = TaskDetail),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Task not found (NOT_FOUND)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_task(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TaskDetail>, AppError> {
    let detail = tasks::task_view(&state, &name, auth_user.as_ref()).await?;
    Ok(Json(detail))
}
