use crate::api::{ApiError, state::AppState};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskflow_models::{Todo, TodoStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub category_id: String,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<TodoStatus>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCompletedResponse {
    pub deleted_count: usize,
}

// GET /api/todos
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.storage.todos.list()?;
    Ok(Json(todos))
}

// GET /api/todos/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state
        .storage
        .todos
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Todo"))?;
    Ok(Json(todo))
}

// POST /api/todos
pub async fn create_todo(
    State(state): State<AppState>,
    Json(request): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    if request.name.trim().is_empty() || request.category_id.trim().is_empty() {
        return Err(ApiError::bad_request("Name and categoryId are required"));
    }

    let todo = Todo::new(
        request.name.trim(),
        request.status,
        request.category_id,
        request.due_date,
    );
    state.storage.todos.create(&todo)?;

    Ok((StatusCode::CREATED, Json(todo)))
}

// PUT /api/todos/{id}
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    let mut todo = state
        .storage
        .todos
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Todo"))?;

    if let Some(name) = request.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::bad_request("Todo name cannot be empty"));
        }
        todo.name = name;
    }

    if let Some(status) = request.status {
        todo.status = status;
    }

    if let Some(category_id) = request.category_id {
        todo.category_id = category_id;
    }

    if let Some(due_date) = request.due_date {
        todo.due_date = due_date;
    }

    state.storage.todos.update(&todo)?;
    Ok(Json(todo))
}

// DELETE /api/todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.storage.todos.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Todo"))
    }
}

// DELETE /api/todos/completed/clear
pub async fn clear_completed(
    State(state): State<AppState>,
) -> Result<Json<ClearCompletedResponse>, ApiError> {
    let deleted_count = state.storage.todos.clear_completed()?;
    Ok(Json(ClearCompletedResponse { deleted_count }))
}
