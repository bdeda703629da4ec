// src/handlers/admin.rs
//
// Rotas administrativas. Todas passam pelo middleware `verify_admin`, que
// já deixou o contexto de identidade nos extensions.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedAdmin,
    models::deal::{Deal, DealPayload, UpdateDealPayload},
    models::restaurant::{
        RestaurantPayload, RestaurantWithCategories, UpdateRestaurantPayload,
    },
};

// == Upload em massa ==

// POST /api/admin/restaurants/bulk-upload
pub async fn bulk_upload_restaurants(
    State(app_state): State<AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Falha ao ler o multipart: {}", e)))?
        .ok_or_else(|| AppError::BadRequest("Nenhum arquivo enviado.".into()))?;

    let filename = field.file_name().unwrap_or("(sem nome)").to_string();
    let media_type = field.content_type().unwrap_or("").to_string();

    // Drena o stream por inteiro antes de qualquer recusa de tipo; um
    // stream cortado no teto de tamanho vira erro de ingestão, não pânico.
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Upload interrompido: {}", e)))?;

    tracing::info!(
        file = %filename,
        media_type = %media_type,
        admin = %admin.email,
        "Processando upload em massa"
    );

    let outcome = app_state.ingest_service.run(&media_type, &bytes).await?;

    // Lote sem nenhuma linha válida é erro do cliente, com o mesmo corpo.
    let status = if outcome.had_valid_rows {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(outcome.report)).into_response())
}

// == Restaurantes ==

// GET /api/admin/restaurants — listagem com as categorias anexadas.
pub async fn list_restaurants(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<RestaurantWithCategories>>, AppError> {
    let restaurants = app_state.restaurant_service.list(None).await?;
    let mut grouped = app_state.category_service.names_grouped().await?;

    let response = restaurants
        .into_iter()
        .map(|restaurant| {
            let categories = grouped.remove(&restaurant.id).unwrap_or_default();
            RestaurantWithCategories { restaurant, categories }
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/restaurants
pub async fn create_restaurant(
    State(app_state): State<AppState>,
    Json(payload): Json<RestaurantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let created = app_state.restaurant_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/admin/restaurants/{id}
pub async fn get_restaurant(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RestaurantWithCategories>, AppError> {
    let restaurant = app_state
        .restaurant_service
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Restaurante"))?;

    let categories = app_state.category_service.names_by_restaurant(id).await?;
    Ok(Json(RestaurantWithCategories { restaurant, categories }))
}

// PUT /api/admin/restaurants/{id}
pub async fn update_restaurant(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRestaurantPayload>,
) -> Result<Json<RestaurantWithCategories>, AppError> {
    let updated = app_state
        .restaurant_service
        .update(id, payload)
        .await?
        .ok_or(AppError::NotFound("Restaurante"))?;

    let categories = app_state.category_service.names_by_restaurant(id).await?;
    Ok(Json(RestaurantWithCategories { restaurant: updated, categories }))
}

// DELETE /api/admin/restaurants/{id}
pub async fn delete_restaurant(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = app_state.restaurant_service.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Restaurante"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// == Promoções ==

// GET /api/admin/deals
pub async fn list_deals(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Deal>>, AppError> {
    let deals = app_state.deal_service.list_all().await?;
    Ok(Json(deals))
}

// POST /api/admin/deals
pub async fn create_deal(
    State(app_state): State<AppState>,
    Json(payload): Json<DealPayload>,
) -> Result<impl IntoResponse, AppError> {
    let created = app_state.deal_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/admin/deals/{id}
pub async fn get_deal(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Deal>, AppError> {
    app_state
        .deal_service
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Promoção"))
}

// PUT /api/admin/deals/{id}
pub async fn update_deal(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDealPayload>,
) -> Result<Json<Deal>, AppError> {
    app_state
        .deal_service
        .update(id, payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Promoção"))
}

// DELETE /api/admin/deals/{id}
pub async fn delete_deal(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = app_state.deal_service.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Promoção"));
    }
    Ok(StatusCode::NO_CONTENT)
}
