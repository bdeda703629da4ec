// src/handlers/users.rs

use axum::{extract::State, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::ProfileResponse,
};

// GET /api/users/me — a mesma decodificação do gate de admin, mas aqui o
// perfil ausente é 404: o token é válido, só não há cadastro.
pub async fn get_me(
    State(app_state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<ProfileResponse>, AppError> {
    let TypedHeader(auth) = auth.ok_or(AppError::Unauthorized)?;

    let profile = app_state.auth_service.get_me(auth.token()).await?;
    Ok(Json(ProfileResponse { profile }))
}
