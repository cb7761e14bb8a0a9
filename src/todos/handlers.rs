use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::extractors::AuthUser;
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;
use crate::store::Todo;
use crate::todos::dto::{CreateTodoRequest, DeletedTodo, UpdateTodoRequest};
use crate::todos::ownership::check_owner;
use crate::validate;

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.store.list_todos_for_user(user_id).await?;
    Ok(Json(todos))
}

#[instrument(skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    payload.validate()?;
    let todo = state.store.create_todo(payload.into_new_todo(user_id)).await?;
    info!(todo_id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = validate::path_id(&id)?;
    let todo = state
        .store
        .find_todo(id)
        .await?
        .ok_or(ApiError::NotFound("Todo not found"))?;
    check_owner(todo.user_id, user_id, "Not authorized to access this todo")?;
    Ok(Json(todo))
}

#[instrument(skip(state, payload))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let id = validate::path_id_with_body(&id, payload.validate())?;
    let mut todo = state
        .store
        .find_todo(id)
        .await?
        .ok_or(ApiError::NotFound("Todo not found"))?;
    check_owner(todo.user_id, user_id, "Not authorized to update this todo")?;

    todo.apply(payload.into_patch());
    let todo = state.store.update_todo(&todo).await?;
    info!(todo_id = %todo.id, "todo updated");
    Ok(Json(todo))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeletedTodo>, ApiError> {
    let id = validate::path_id(&id)?;
    let todo = state
        .store
        .find_todo(id)
        .await?
        .ok_or(ApiError::NotFound("Todo not found"))?;
    check_owner(todo.user_id, user_id, "Not authorized to delete this todo")?;

    state.store.delete_todo(id).await?;
    info!(todo_id = %id, "todo deleted");
    Ok(Json(DeletedTodo { id }))
}
