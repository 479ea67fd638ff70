use crate::api::{ApiError, state::AppState};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use taskflow_models::Category;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
}

// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.storage.categories.list()?;
    Ok(Json(categories))
}

// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .storage
        .categories
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Category"))?;
    Ok(Json(category))
}

// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }

    let category = Category::new(request.name.trim());
    state.storage.categories.create(&category)?;

    Ok((StatusCode::CREATED, Json(category)))
}

// DELETE /api/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.storage.categories.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Category"))
    }
}
