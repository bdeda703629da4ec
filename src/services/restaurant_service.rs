// src/services/restaurant_service.rs

use crate::{
    common::error::AppError,
    common::timeout::{run_with_deadline, DB_DEADLINE_MS},
    db::geo::GeoPoint,
    db::{CategoryRepository, RestaurantRepository},
    models::restaurant::{
        NewRestaurant, Restaurant, RestaurantPayload, UpdateRestaurantPayload,
    },
};

#[derive(Clone)]
pub struct RestaurantService {
    restaurants: RestaurantRepository,
    categories: CategoryRepository,
}

impl RestaurantService {
    pub fn new(restaurants: RestaurantRepository, categories: CategoryRepository) -> Self {
        Self { restaurants, categories }
    }

    /// Lista restaurantes, com a distância computada quando há um ponto de
    /// referência. Cada linha passa pela normalização do modelo.
    pub async fn list(&self, geo: Option<GeoPoint>) -> Result<Vec<Restaurant>, AppError> {
        let repo = self.restaurants.clone();
        let rows =
            run_with_deadline(DB_DEADLINE_MS, async move { repo.list(geo).await }).await?;

        Ok(rows.into_iter().map(Restaurant::normalized).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, AppError> {
        let repo = self.restaurants.clone();
        let row =
            run_with_deadline(DB_DEADLINE_MS, async move { repo.find_by_id(id).await }).await?;

        Ok(row.map(Restaurant::normalized))
    }

    pub async fn create(&self, payload: RestaurantPayload) -> Result<Restaurant, AppError> {
        // Validação local antes de qualquer ida ao banco.
        let new = NewRestaurant::from_payload(payload)?;

        let repo = self.restaurants.clone();
        let created =
            run_with_deadline(DB_DEADLINE_MS, async move { repo.insert(new).await }).await?;

        Ok(created.normalized())
    }

    /// Atualiza os campos escalares presentes e, quando o payload traz
    /// `categories`, substitui o conjunto inteiro de categorias como efeito
    /// da mesma operação lógica — mesmo sem nenhum campo escalar.
    /// `Ok(None)` quando o restaurante não existe.
    pub async fn update(
        &self,
        id: i64,
        payload: UpdateRestaurantPayload,
    ) -> Result<Option<Restaurant>, AppError> {
        if payload.is_empty() {
            return Err(AppError::Validation(
                "Nenhum campo válido para atualizar.".into(),
            ));
        }

        let updated = if payload.has_scalar_changes() {
            let repo = self.restaurants.clone();
            let changes = payload.clone();
            run_with_deadline(DB_DEADLINE_MS, async move { repo.update(id, &changes).await })
                .await?
        } else {
            // Só categorias: confirma que o restaurante existe antes do
            // replace-all.
            self.find_by_id(id).await?
        };

        let Some(updated) = updated else {
            return Ok(None);
        };

        if let Some(names) = payload.categories {
            let repo = self.categories.clone();
            run_with_deadline(DB_DEADLINE_MS, async move {
                repo.replace_for_restaurant(id, &names).await
            })
            .await?;
        }

        Ok(Some(updated.normalized()))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let repo = self.restaurants.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.delete(id).await }).await
    }

    /// Insert em lote usado pelo pipeline de ingestão.
    pub async fn bulk_insert(&self, batch: Vec<NewRestaurant>) -> Result<u64, AppError> {
        let repo = self.restaurants.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.insert_many(&batch).await }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Os caminhos de validação não tocam o banco, então dá para exercitar
    // o serviço com uma pool desconectada.
    fn service() -> RestaurantService {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/teste")
            .expect("pool lazy");
        RestaurantService::new(
            RestaurantRepository::new(pool.clone()),
            CategoryRepository::new(pool),
        )
    }

    #[tokio::test]
    async fn update_sem_campos_efetivos_falha_sem_escrever() {
        let result = service().update(1, UpdateRestaurantPayload::default()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn create_invalido_falha_antes_de_qualquer_ida_ao_banco() {
        let payload = RestaurantPayload {
            name: "".into(),
            logo_url: None,
            website_url: None,
            reviews_count: None,
            average_rating: None,
            address: "".into(),
            maps_url: None,
            latitude: None,
            longitude: None,
        };
        let result = service().create(payload).await;
        assert!(matches!(result, Err(AppError::ValidationErrors(_))));
    }
}
