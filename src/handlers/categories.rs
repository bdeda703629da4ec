// src/handlers/categories.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError, config::AppState, models::category::RestaurantCategory,
};

// GET /api/categories
pub async fn get_all_categories(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<RestaurantCategory>>, AppError> {
    let categories = app_state.category_service.list_all().await?;
    Ok(Json(categories))
}

// GET /api/categories/{id}
pub async fn get_category_by_id(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RestaurantCategory>, AppError> {
    app_state
        .category_service
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Categoria"))
}
