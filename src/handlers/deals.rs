// src/handlers/deals.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError,
    common::timeout::{run_with_deadline, HANDLER_DEADLINE_MS},
    config::AppState,
    models::deal::Deal,
};

// GET /api/deals
pub async fn get_all_deals(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Deal>>, AppError> {
    let service = app_state.deal_service.clone();
    let deals =
        run_with_deadline(HANDLER_DEADLINE_MS, async move { service.list_all().await }).await?;

    tracing::info!(count = deals.len(), "Promoções retornadas");
    Ok(Json(deals))
}

// GET /api/deals/{restaurant_id}
pub async fn get_deals_by_restaurant(
    State(app_state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<Json<Vec<Deal>>, AppError> {
    let deals = app_state.deal_service.list_by_restaurant(restaurant_id).await?;
    Ok(Json(deals))
}
