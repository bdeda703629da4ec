// src/models/deal.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::error::AppError;

// Representa uma promoção vinda do banco de dados.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Deal {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub details: String,
    pub restaurant_id: i64,
    pub summarized_deal: String,
    pub price: Decimal,
    // Nome do restaurante desnormalizado, para exibição sem join.
    pub restaurant_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DealPayload {
    #[validate(length(min = 1, message = "Os detalhes são obrigatórios."))]
    pub details: String,
    pub restaurant_id: i64,
    #[validate(length(min = 1, message = "O resumo da promoção é obrigatório."))]
    pub summarized_deal: String,
    pub price: Decimal,
    #[validate(length(min = 1, message = "O nome do restaurante é obrigatório."))]
    pub restaurant_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDeal {
    pub details: String,
    pub restaurant_id: i64,
    pub summarized_deal: String,
    pub price: Decimal,
    pub restaurant_name: String,
}

impl NewDeal {
    pub fn from_payload(payload: DealPayload) -> Result<Self, AppError> {
        payload.validate()?;

        Ok(Self {
            details: payload.details,
            restaurant_id: payload.restaurant_id,
            summarized_deal: payload.summarized_deal,
            price: payload.price,
            restaurant_name: payload.restaurant_name,
        })
    }
}

// `id` e `created_at` são imutáveis: não existem no payload de update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDealPayload {
    pub details: Option<String>,
    pub restaurant_id: Option<i64>,
    pub summarized_deal: Option<String>,
    pub price: Option<Decimal>,
    pub restaurant_name: Option<String>,
}

impl UpdateDealPayload {
    pub fn is_empty(&self) -> bool {
        self.details.is_none()
            && self.restaurant_id.is_none()
            && self.summarized_deal.is_none()
            && self.price.is_none()
            && self.restaurant_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promocao_completa_e_aceita() {
        let payload = DealPayload {
            details: "2 por 1 às terças".into(),
            restaurant_id: 7,
            summarized_deal: "2x1".into(),
            price: Decimal::new(2990, 2),
            restaurant_name: "Cantina da Nona".into(),
        };
        assert!(NewDeal::from_payload(payload).is_ok());
    }

    #[test]
    fn promocao_sem_resumo_e_rejeitada() {
        let payload = DealPayload {
            details: "2 por 1 às terças".into(),
            restaurant_id: 7,
            summarized_deal: "".into(),
            price: Decimal::new(2990, 2),
            restaurant_name: "Cantina da Nona".into(),
        };
        assert!(NewDeal::from_payload(payload).is_err());
    }

    #[test]
    fn update_sem_campos_e_vazio() {
        assert!(UpdateDealPayload::default().is_empty());
    }
}
