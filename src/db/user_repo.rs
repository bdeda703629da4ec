// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::UserProfile};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve o sujeito do token (UID do provedor de autenticação) para o
    /// perfil de papel interno, via join de users com role_types.
    /// `None` quando não há perfil cadastrado para o sujeito.
    pub async fn find_profile_by_subject(
        &self,
        auth_subject: Uuid,
    ) -> Result<Option<UserProfile>, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT u.id AS app_user_id, u.email, r.id AS role_id, r.role_type
            FROM users u
            JOIN role_types r ON r.id = u.role_id
            WHERE u.supabase_uid = $1
            "#,
        )
        .bind(auth_subject)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
