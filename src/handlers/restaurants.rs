// src/handlers/restaurants.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    common::timeout::{run_with_deadline, HANDLER_DEADLINE_MS},
    config::AppState,
    db::geo::GeoPoint,
    models::restaurant::Restaurant,
};

// Os parâmetros chegam como texto e são coagidos aqui: valor ilegível é
// tratado como ausente (lista sem distância), nunca como erro.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    #[serde(rename = "userLat")]
    pub user_lat: Option<String>,
    #[serde(rename = "userLon")]
    pub user_lon: Option<String>,
}

impl LocationQuery {
    fn geo_point(&self) -> Option<GeoPoint> {
        let lat = self.user_lat.as_deref().and_then(|s| s.parse().ok());
        let lon = self.user_lon.as_deref().and_then(|s| s.parse().ok());
        GeoPoint::from_params(lat, lon)
    }
}

// GET /api/restaurants?userLat=..&userLon=..
pub async fn get_all_restaurants(
    State(app_state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<Vec<Restaurant>>, AppError> {
    let geo = params.geo_point();

    let service = app_state.restaurant_service.clone();
    let restaurants =
        run_with_deadline(HANDLER_DEADLINE_MS, async move { service.list(geo).await }).await?;

    tracing::info!(count = restaurants.len(), "Restaurantes retornados");
    Ok(Json(restaurants))
}
