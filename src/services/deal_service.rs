// src/services/deal_service.rs

use crate::{
    common::error::AppError,
    common::timeout::{run_with_deadline, DB_DEADLINE_MS},
    db::DealRepository,
    models::deal::{Deal, DealPayload, NewDeal, UpdateDealPayload},
};

#[derive(Clone)]
pub struct DealService {
    deals: DealRepository,
}

impl DealService {
    pub fn new(deals: DealRepository) -> Self {
        Self { deals }
    }

    pub async fn list_all(&self) -> Result<Vec<Deal>, AppError> {
        let repo = self.deals.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.list_all().await }).await
    }

    /// Promoções de um restaurante. O id precisa ser um inteiro positivo;
    /// lista vazia é resultado válido, não erro.
    pub async fn list_by_restaurant(&self, restaurant_id: i64) -> Result<Vec<Deal>, AppError> {
        if restaurant_id <= 0 {
            return Err(AppError::Validation(format!(
                "Formato de id de restaurante inválido: {}",
                restaurant_id
            )));
        }

        let repo = self.deals.clone();
        run_with_deadline(DB_DEADLINE_MS, async move {
            repo.list_by_restaurant(restaurant_id).await
        })
        .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Deal>, AppError> {
        let repo = self.deals.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.find_by_id(id).await }).await
    }

    pub async fn create(&self, payload: DealPayload) -> Result<Deal, AppError> {
        let new = NewDeal::from_payload(payload)?;

        let repo = self.deals.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.insert(new).await }).await
    }

    pub async fn update(
        &self,
        id: i64,
        payload: UpdateDealPayload,
    ) -> Result<Option<Deal>, AppError> {
        if payload.is_empty() {
            return Err(AppError::Validation(
                "Nenhum campo válido para atualizar.".into(),
            ));
        }

        let repo = self.deals.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.update(id, &payload).await }).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let repo = self.deals.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.delete(id).await }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // O caminho de validação não toca o banco, então dá para exercitar o
    // serviço com uma pool desconectada.
    fn service() -> DealService {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/teste")
            .expect("pool lazy");
        DealService::new(DealRepository::new(pool))
    }

    #[tokio::test]
    async fn id_de_restaurante_nao_positivo_e_rejeitado() {
        let result = service().list_by_restaurant(0).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service().list_by_restaurant(-3).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn update_sem_campos_falha_sem_tocar_o_banco() {
        let result = service().update(1, UpdateDealPayload::default()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
