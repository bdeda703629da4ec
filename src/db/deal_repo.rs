// src/db/deal_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::db_utils::map_fk_violation,
    common::error::AppError,
    models::deal::{Deal, NewDeal, UpdateDealPayload},
};

const DEAL_COLUMNS: &str =
    "id, created_at, details, restaurant_id, summarized_deal, price, restaurant_name";

#[derive(Clone)]
pub struct DealRepository {
    pool: PgPool,
}

impl DealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Deal>, AppError> {
        let deals = sqlx::query_as::<_, Deal>(
            "SELECT id, created_at, details, restaurant_id, summarized_deal, price, \
             restaurant_name FROM deals ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(deals)
    }

    /// Promoções de um restaurante. Lista vazia é resultado válido.
    pub async fn list_by_restaurant(&self, restaurant_id: i64) -> Result<Vec<Deal>, AppError> {
        let deals = sqlx::query_as::<_, Deal>(
            "SELECT id, created_at, details, restaurant_id, summarized_deal, price, \
             restaurant_name FROM deals WHERE restaurant_id = $1",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deals)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            "SELECT id, created_at, details, restaurant_id, summarized_deal, price, \
             restaurant_name FROM deals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deal)
    }

    pub async fn insert(&self, new: NewDeal) -> Result<Deal, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO deals (details, restaurant_id, summarized_deal, price, restaurant_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at, details, restaurant_id, summarized_deal, price,
                      restaurant_name
            "#,
        )
        .bind(&new.details)
        .bind(new.restaurant_id)
        .bind(&new.summarized_deal)
        .bind(new.price)
        .bind(&new.restaurant_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_fk_violation(
                e,
                format!("O restaurante {} não existe.", new.restaurant_id),
            )
        })?;

        Ok(deal)
    }

    pub async fn update(
        &self,
        id: i64,
        changes: &UpdateDealPayload,
    ) -> Result<Option<Deal>, AppError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE deals SET ");
        let mut fields = query.separated(", ");

        if let Some(details) = &changes.details {
            fields.push("details = ").push_bind_unseparated(details.clone());
        }
        if let Some(restaurant_id) = changes.restaurant_id {
            fields.push("restaurant_id = ").push_bind_unseparated(restaurant_id);
        }
        if let Some(summarized_deal) = &changes.summarized_deal {
            fields
                .push("summarized_deal = ")
                .push_bind_unseparated(summarized_deal.clone());
        }
        if let Some(price) = changes.price {
            fields.push("price = ").push_bind_unseparated(price);
        }
        if let Some(restaurant_name) = &changes.restaurant_name {
            fields
                .push("restaurant_name = ")
                .push_bind_unseparated(restaurant_name.clone());
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ");
        query.push(DEAL_COLUMNS);

        let deal = query
            .build_query_as::<Deal>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_fk_violation(e, missing_restaurant_message(changes.restaurant_id)))?;

        Ok(deal)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Mensagem da violação de FK no update: só cita o restaurante quando o
/// payload trouxe um id (a violação também pode vir de outra origem).
fn missing_restaurant_message(restaurant_id: Option<i64>) -> String {
    match restaurant_id {
        Some(id) => format!("O restaurante {} não existe.", id),
        None => "O restaurante referenciado não existe.".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mensagem_de_fk_so_cita_o_restaurante_quando_ele_veio_no_payload() {
        assert_eq!(
            missing_restaurant_message(Some(42)),
            "O restaurante 42 não existe."
        );
        assert_eq!(
            missing_restaurant_message(None),
            "O restaurante referenciado não existe."
        );
    }
}
