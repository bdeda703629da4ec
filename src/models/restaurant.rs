// src/models/restaurant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::error::AppError;

/// Normaliza a nota bruta para a escala de meio ponto:
/// arredonda e divide por dois (ex.: 8.6 -> 4.5).
pub fn normalize_rating(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.round() / 2.0
}

/// Arredonda uma distância em km para 2 casas decimais.
pub fn round_distance(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

// Representa um restaurante vindo do banco de dados.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub reviews_count: i32,
    pub average_rating: f64,
    pub address: String,
    pub maps_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    // Coluna computada, presente apenas quando a consulta pediu distância.
    // `None` é o sentinela explícito de "sem localização", nunca zero.
    #[sqlx(default)]
    pub distance: Option<f64>,
}

impl Restaurant {
    /// Aplica as regras de normalização do modelo a uma linha recém-lida:
    /// nota na escala de meio ponto e distância com 2 casas decimais.
    pub fn normalized(mut self) -> Self {
        self.average_rating = normalize_rating(self.average_rating);
        self.distance = self.distance.map(round_distance);
        self
    }
}

// Dados de entrada para criação (e para cada linha do upload em massa).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RestaurantPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub reviews_count: Option<i32>,
    pub average_rating: Option<f64>,
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,
    pub maps_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Registro validado e pronto para persistir. Só nasce pelo construtor,
/// nunca meio-preenchido.
#[derive(Debug, Clone, Serialize)]
pub struct NewRestaurant {
    pub name: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub reviews_count: i32,
    pub average_rating: f64,
    pub address: String,
    pub maps_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NewRestaurant {
    /// A nota é persistida crua; a normalização para meio ponto acontece
    /// uma única vez, na leitura (`Restaurant::normalized`).
    pub fn from_payload(payload: RestaurantPayload) -> Result<Self, AppError> {
        payload.validate()?;

        Ok(Self {
            name: payload.name,
            logo_url: payload.logo_url,
            website_url: payload.website_url,
            reviews_count: payload.reviews_count.unwrap_or(0).max(0),
            average_rating: payload.average_rating.unwrap_or(0.0),
            address: payload.address,
            maps_url: payload.maps_url,
            latitude: payload.latitude,
            longitude: payload.longitude,
        })
    }
}

// Dados de entrada para atualização. `id` e `created_at` são imutáveis e
// simplesmente não existem aqui; se vierem no JSON, são ignorados.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRestaurantPayload {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub reviews_count: Option<i32>,
    pub average_rating: Option<f64>,
    pub address: Option<String>,
    pub maps_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    // Quando presente, substitui o conjunto inteiro de categorias.
    pub categories: Option<Vec<String>>,
}

impl UpdateRestaurantPayload {
    pub fn has_scalar_changes(&self) -> bool {
        self.name.is_some()
            || self.logo_url.is_some()
            || self.website_url.is_some()
            || self.reviews_count.is_some()
            || self.average_rating.is_some()
            || self.address.is_some()
            || self.maps_url.is_some()
            || self.latitude.is_some()
            || self.longitude.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_scalar_changes() && self.categories.is_none()
    }
}

// Restaurante com as categorias anexadas (resposta das rotas de admin).
#[derive(Debug, Serialize)]
pub struct RestaurantWithCategories {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nota_normalizada_para_meio_ponto() {
        assert_eq!(normalize_rating(8.6), 4.5);
        assert_eq!(normalize_rating(7.2), 3.5);
        assert_eq!(normalize_rating(10.0), 5.0);
        assert_eq!(normalize_rating(0.0), 0.0);
        assert_eq!(normalize_rating(f64::NAN), 0.0);
    }

    #[test]
    fn distancia_arredondada_para_duas_casas() {
        assert_eq!(round_distance(12.3456), 12.35);
        assert_eq!(round_distance(0.004), 0.0);
    }

    #[test]
    fn construtor_rejeita_nome_ou_endereco_vazios() {
        let payload = RestaurantPayload {
            name: "".into(),
            logo_url: None,
            website_url: None,
            reviews_count: None,
            average_rating: None,
            address: "Rua A, 1".into(),
            maps_url: None,
            latitude: None,
            longitude: None,
        };
        assert!(NewRestaurant::from_payload(payload).is_err());
    }

    #[test]
    fn construtor_aplica_padroes_e_guarda_a_nota_crua() {
        let payload = RestaurantPayload {
            name: "Cantina da Nona".into(),
            logo_url: None,
            website_url: None,
            reviews_count: None,
            average_rating: Some(9.0),
            address: "Rua A, 1".into(),
            maps_url: None,
            latitude: None,
            longitude: None,
        };
        let new = NewRestaurant::from_payload(payload).unwrap();
        assert_eq!(new.reviews_count, 0);
        assert_eq!(new.average_rating, 9.0);
    }

    // A regra de meio ponto não é idempotente (9.0 -> 4.5 -> 2.5), então
    // ela roda em exatamente um ponto: a leitura. Criar e depois ler tem
    // que exibir o mesmo valor que uma linha semeada direto no banco.
    #[test]
    fn nota_e_normalizada_uma_unica_vez_na_leitura() {
        let payload = RestaurantPayload {
            name: "Cantina da Nona".into(),
            logo_url: None,
            website_url: None,
            reviews_count: None,
            average_rating: Some(9.0),
            address: "Rua A, 1".into(),
            maps_url: None,
            latitude: None,
            longitude: None,
        };
        let stored = NewRestaurant::from_payload(payload).unwrap().average_rating;

        // Caminho de leitura sobre o valor persistido.
        let displayed = normalize_rating(stored);
        assert_eq!(displayed, 4.5);
    }

    #[test]
    fn distancia_ausente_serializa_como_null_e_nunca_zero() {
        let restaurant = Restaurant {
            id: 1,
            created_at: chrono::Utc::now(),
            name: "Cantina da Nona".into(),
            logo_url: None,
            website_url: None,
            reviews_count: 0,
            average_rating: 0.0,
            address: "Rua A, 1".into(),
            maps_url: None,
            latitude: None,
            longitude: None,
            distance: None,
        };
        let json = serde_json::to_value(&restaurant).unwrap();
        assert!(json["distance"].is_null());

        let com_distancia = Restaurant { distance: Some(3.126), ..restaurant }.normalized();
        assert_eq!(com_distancia.distance, Some(3.13));
    }

    #[test]
    fn update_vazio_e_detectado() {
        let payload = UpdateRestaurantPayload::default();
        assert!(payload.is_empty());

        let so_categorias = UpdateRestaurantPayload {
            categories: Some(vec![]),
            ..Default::default()
        };
        assert!(!so_categorias.is_empty());
        assert!(!so_categorias.has_scalar_changes());
    }
}
