// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Claims que nos interessam no JWT emitido pelo provedor de autenticação.
// A assinatura é verificada rio acima; aqui só extraímos o `sub`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
}

// Perfil de papel resolvido pelo join do sujeito de autenticação com a
// tabela interna de usuários. Derivado, nunca persistido por este núcleo.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub app_user_id: Uuid,
    pub email: String,
    pub role_id: i32,
    pub role_type: String,
}

/// Contexto de identidade anexado à requisição depois do `verify_admin`.
/// Fica nos extensions e é consumido pelos handlers sem nova resolução.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub auth_id: Uuid,
    pub app_id: Uuid,
    pub email: String,
    pub role: String,
}

// Resposta do GET /api/users/me.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
}
