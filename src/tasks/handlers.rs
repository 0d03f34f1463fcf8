use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{MessageResponse, TaskPayload};
use super::model::Task;
use super::service::TaskService;
use crate::auth::dto::PublicUser;
use crate::auth::extractors::{AdminUser, AuthUser};
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id", get(get_user))
        .route("/admin/tasks/user/:user_id", get(list_tasks_by_owner))
}

// --- authenticated task CRUD ---

#[instrument(skip(state, payload, caller), fields(user_id = %caller.0.sub))]
async fn create_task(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = TaskService::new(state.tasks.clone())
        .create(&caller.0, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, _caller))]
async fn list_tasks(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = TaskService::new(state.tasks.clone()).list().await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, _caller))]
async fn get_task(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, AppError> {
    let task = TaskService::new(state.tasks.clone()).get(id).await?;
    Ok(Json(task))
}

#[instrument(skip(state, payload, _caller))]
async fn update_task(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<Task>, AppError> {
    let task = TaskService::new(state.tasks.clone())
        .update(id, payload)
        .await?;
    Ok(Json(task))
}

#[instrument(skip(state, _caller))]
async fn delete_task(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    TaskService::new(state.tasks.clone()).delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Task has been deleted successfully".into(),
    }))
}

// --- admin tier ---

#[instrument(skip(state, _admin))]
async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, _admin))]
async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, _admin))]
async fn list_tasks_by_owner(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = TaskService::new(state.tasks.clone())
        .list_by_owner(user_id)
        .await?;
    Ok(Json(tasks))
}
