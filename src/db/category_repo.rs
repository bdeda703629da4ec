// src/db/category_repo.rs

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::db_utils::map_fk_violation, common::error::AppError,
    models::category::RestaurantCategory,
};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<RestaurantCategory>, AppError> {
        let categories = sqlx::query_as::<_, RestaurantCategory>(
            "SELECT id, created_at, restaurant_id, category_name FROM restaurant_categories",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<RestaurantCategory>, AppError> {
        let category = sqlx::query_as::<_, RestaurantCategory>(
            "SELECT id, created_at, restaurant_id, category_name FROM restaurant_categories \
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Nomes das categorias de um restaurante, para anexar nas respostas.
    pub async fn names_by_restaurant(&self, restaurant_id: i64) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT category_name FROM restaurant_categories WHERE restaurant_id = $1 \
             ORDER BY id",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// Todas as categorias agrupadas por restaurante, em uma única consulta
    /// (a listagem de admin anexa os nomes sem fazer join por linha).
    pub async fn names_grouped(&self) -> Result<HashMap<i64, Vec<String>>, AppError> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT restaurant_id, category_name FROM restaurant_categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();
        for (restaurant_id, name) in rows {
            grouped.entry(restaurant_id).or_default().push(name);
        }
        Ok(grouped)
    }

    /// Substituição total (replace-all): apaga todas as categorias do
    /// restaurante e, se a lista nova não for vazia, insere uma linha por
    /// nome. Lista vazia limpa o conjunto. As duas etapas rodam na mesma
    /// transação, então não existe janela em que o restaurante fica sem
    /// categorias por falha parcial.
    pub async fn replace_for_restaurant(
        &self,
        restaurant_id: i64,
        names: &[String],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM restaurant_categories WHERE restaurant_id = $1")
            .bind(restaurant_id)
            .execute(&mut *tx)
            .await?;

        if !names.is_empty() {
            let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO restaurant_categories (restaurant_id, category_name) ",
            );
            query.push_values(names, |mut row, name| {
                row.push_bind(restaurant_id).push_bind(name);
            });

            query.build().execute(&mut *tx).await.map_err(|e| {
                map_fk_violation(e, format!("O restaurante {} não existe.", restaurant_id))
            })?;
        }

        tx.commit().await?;
        Ok(())
    }
}
