/// Task endpoints
///
/// - `POST   /api/v1/tasks` - Create a task
/// - `GET    /api/v1/tasks/:id` - Read a task
/// - `PUT    /api/v1/tasks/:id` - Replace a task's title and description
/// - `DELETE /api/v1/tasks/:id` - Delete a task
///
/// `is_completed` and `user_id` are not writable through these routes.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ErrorResponse},
    schemas::{EntityId, TaskCreate, TaskResponse, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use taskman_shared::models::{task::Task, Entity};
use taskman_shared::store::Repository;
use tracing::info;

#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = TaskCreate,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<TaskCreate>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let mut session = state.session().await?;

    let task = Repository::<Task>::create(&state.store, &mut session, body.into()).await?;

    info!(task_id = task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
    ),
    tag = "tasks"
)]
pub async fn read_task(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Json<TaskResponse>> {
    let mut session = state.session().await?;

    let task = Repository::<Task>::get(&state.store, &mut session, id)
        .await?
        .ok_or_else(|| ApiError::not_found(Task::NAME))?;

    Ok(Json(task.into()))
}

/// Replace a task's title and description
///
/// An omitted `description` clears it.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    request_body = TaskCreate,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(body): ValidatedJson<TaskCreate>,
) -> ApiResult<Json<TaskResponse>> {
    let mut session = state.session().await?;

    let task = Repository::<Task>::update(&state.store, &mut session, id, body.into())
        .await?
        .ok_or_else(|| ApiError::not_found(Task::NAME))?;

    info!(task_id = task.id, "Task updated");
    Ok(Json(task.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found", body = ErrorResponse),
    ),
    tag = "tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<StatusCode> {
    let mut session = state.session().await?;

    if !Repository::<Task>::delete(&state.store, &mut session, id).await? {
        return Err(ApiError::not_found(Task::NAME));
    }

    info!(task_id = id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}
