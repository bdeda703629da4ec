// src/db/restaurant_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::db_utils::map_fk_violation,
    common::error::AppError,
    db::geo::{self, GeoPoint},
    models::restaurant::{NewRestaurant, Restaurant, UpdateRestaurantPayload},
};

const RETURNING_COLUMNS: &str = "id, created_at, name, logo_url, website_url, reviews_count, \
     average_rating, address, maps_url, latitude, longitude";

#[derive(Clone)]
pub struct RestaurantRepository {
    pool: PgPool,
}

impl RestaurantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista todos os restaurantes. Com um ponto de referência, a consulta
    /// traz a coluna computada `distance` (ver `db::geo`).
    pub async fn list(&self, geo: Option<GeoPoint>) -> Result<Vec<Restaurant>, AppError> {
        let mut query = geo::restaurant_select(geo);
        query.push(" ORDER BY id");

        let rows = query
            .build_query_as::<Restaurant>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, AppError> {
        let mut query = geo::restaurant_select(None);
        query.push(" WHERE id = ").push_bind(id);

        let row = query
            .build_query_as::<Restaurant>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn insert(&self, new: NewRestaurant) -> Result<Restaurant, AppError> {
        let restaurant = sqlx::query_as::<_, Restaurant>(
            r#"
            INSERT INTO restaurants (
                name, logo_url, website_url, reviews_count,
                average_rating, address, maps_url, latitude, longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, created_at, name, logo_url, website_url, reviews_count,
                      average_rating, address, maps_url, latitude, longitude
            "#,
        )
        .bind(&new.name)
        .bind(&new.logo_url)
        .bind(&new.website_url)
        .bind(new.reviews_count)
        .bind(new.average_rating)
        .bind(&new.address)
        .bind(&new.maps_url)
        .bind(new.latitude)
        .bind(new.longitude)
        .fetch_one(&self.pool)
        .await?;

        Ok(restaurant)
    }

    /// Insere o lote inteiro em um único INSERT multi-linha.
    pub async fn insert_many(&self, batch: &[NewRestaurant]) -> Result<u64, AppError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO restaurants (name, logo_url, website_url, reviews_count, \
             average_rating, address, maps_url, latitude, longitude) ",
        );
        query.push_values(batch, |mut row, new| {
            row.push_bind(&new.name)
                .push_bind(&new.logo_url)
                .push_bind(&new.website_url)
                .push_bind(new.reviews_count)
                .push_bind(new.average_rating)
                .push_bind(&new.address)
                .push_bind(&new.maps_url)
                .push_bind(new.latitude)
                .push_bind(new.longitude);
        });

        let result = query.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Atualiza apenas os campos presentes no payload, filtrando por id.
    /// Zero linhas afetadas => `Ok(None)`, não é erro.
    pub async fn update(
        &self,
        id: i64,
        changes: &UpdateRestaurantPayload,
    ) -> Result<Option<Restaurant>, AppError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE restaurants SET ");
        let mut fields = query.separated(", ");

        if let Some(name) = &changes.name {
            fields.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(logo_url) = &changes.logo_url {
            fields.push("logo_url = ").push_bind_unseparated(logo_url.clone());
        }
        if let Some(website_url) = &changes.website_url {
            fields.push("website_url = ").push_bind_unseparated(website_url.clone());
        }
        if let Some(reviews_count) = changes.reviews_count {
            fields.push("reviews_count = ").push_bind_unseparated(reviews_count);
        }
        if let Some(average_rating) = changes.average_rating {
            fields.push("average_rating = ").push_bind_unseparated(average_rating);
        }
        if let Some(address) = &changes.address {
            fields.push("address = ").push_bind_unseparated(address.clone());
        }
        if let Some(maps_url) = &changes.maps_url {
            fields.push("maps_url = ").push_bind_unseparated(maps_url.clone());
        }
        if let Some(latitude) = changes.latitude {
            fields.push("latitude = ").push_bind_unseparated(latitude);
        }
        if let Some(longitude) = changes.longitude {
            fields.push("longitude = ").push_bind_unseparated(longitude);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ");
        query.push(RETURNING_COLUMNS);

        let row = query
            .build_query_as::<Restaurant>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Remove por id; sucesso = pelo menos uma linha afetada. Promoções ou
    /// categorias dependentes fazem o banco recusar com violação de FK,
    /// que reclassificamos aqui.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_fk_violation(
                    e,
                    format!(
                        "O restaurante {} ainda possui promoções ou categorias associadas.",
                        id
                    ),
                )
            })?;

        Ok(result.rows_affected() > 0)
    }
}
