// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::AdminUser};

/// Porta de entrada de todas as rotas administrativas: exige
/// `Authorization: Bearer <token>`, resolve o papel no banco e anexa o
/// contexto de identidade nos extensions. Os handlers seguintes consomem
/// o contexto sem refazer a resolução.
pub async fn verify_admin(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let admin = app_state.auth_service.verify_admin(token).await?;
            tracing::debug!(email = %admin.email, "Administrador autenticado");

            request.extensions_mut().insert(admin);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::Unauthorized)
}

// Extrator para obter o administrador autenticado diretamente nos handlers.
pub struct AuthenticatedAdmin(pub AdminUser);

impl<S> FromRequestParts<S> for AuthenticatedAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminUser>()
            .cloned()
            .map(AuthenticatedAdmin)
            .ok_or(AppError::Unauthorized)
    }
}
