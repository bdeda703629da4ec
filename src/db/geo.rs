// src/db/geo.rs

use sqlx::{Postgres, QueryBuilder};

/// Raio da Terra em quilômetros, para a fórmula de Haversine.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Ponto de referência validado para o cálculo de distância.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Constrói o ponto a partir dos parâmetros opcionais da requisição.
    ///
    /// Coordenadas parciais (só uma presente) ou fora da faixa válida
    /// (±90°/±180°) são tratadas como ausentes e registradas no log —
    /// nunca rejeitadas com erro. Sem ponto, a consulta simplesmente não
    /// pede a coluna de distância.
    pub fn from_params(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon))
                if lat.is_finite()
                    && lon.is_finite()
                    && (-90.0..=90.0).contains(&lat)
                    && (-180.0..=180.0).contains(&lon) =>
            {
                Some(Self { lat, lon })
            }
            (None, None) => None,
            (lat, lon) => {
                tracing::warn!(
                    ?lat,
                    ?lon,
                    "Coordenadas parciais ou fora da faixa; listando sem distância"
                );
                None
            }
        }
    }
}

/// Monta o SELECT da tabela de restaurantes, acrescentando a coluna
/// computada `distance` (Haversine, em km, no próprio banco) quando há um
/// ponto de referência. Sem ponto, a coluna é omitida por completo — a
/// distância jamais é calculada do lado do cliente.
///
/// Linhas com latitude/longitude nulas produzem `distance` NULL mesmo
/// quando a coluna foi pedida: NULL propaga pela expressão.
pub fn restaurant_select(geo: Option<GeoPoint>) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(
        "SELECT id, created_at, name, logo_url, website_url, reviews_count, \
         average_rating, address, maps_url, latitude, longitude",
    );

    if let Some(point) = geo {
        query.push(", (");
        query.push(EARTH_RADIUS_KM.to_string());
        query.push(" * acos( cos(radians(");
        query.push_bind(point.lat);
        query.push(")) * cos(radians(latitude)) * cos(radians(longitude) - radians(");
        query.push_bind(point.lon);
        query.push(")) + sin(radians(");
        query.push_bind(point.lat);
        query.push(")) * sin(radians(latitude)) )) AS distance");
    }

    query.push(" FROM restaurants");
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordenadas_validas_produzem_ponto() {
        let point = GeoPoint::from_params(Some(-23.55), Some(-46.63));
        assert_eq!(point, Some(GeoPoint { lat: -23.55, lon: -46.63 }));
    }

    #[test]
    fn coordenada_parcial_e_tratada_como_ausente() {
        assert!(GeoPoint::from_params(Some(-23.55), None).is_none());
        assert!(GeoPoint::from_params(None, Some(-46.63)).is_none());
    }

    #[test]
    fn coordenada_fora_da_faixa_e_tratada_como_ausente() {
        assert!(GeoPoint::from_params(Some(91.0), Some(0.0)).is_none());
        assert!(GeoPoint::from_params(Some(0.0), Some(-180.5)).is_none());
        assert!(GeoPoint::from_params(Some(f64::NAN), Some(0.0)).is_none());
    }

    #[test]
    fn select_sem_ponto_omite_a_coluna_de_distancia() {
        let sql = restaurant_select(None).into_sql();
        assert!(!sql.contains("acos"));
        assert!(!sql.contains("distance"));
    }

    #[test]
    fn select_com_ponto_pede_a_distancia_no_banco() {
        let sql = restaurant_select(GeoPoint::from_params(Some(10.0), Some(20.0))).into_sql();
        assert!(sql.contains("6371"));
        assert!(sql.contains("acos"));
        assert!(sql.contains("AS distance"));
    }
}
