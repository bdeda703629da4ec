// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{CategoryRepository, DealRepository, RestaurantRepository, UserRepository},
    services::{
        auth::AuthService, category_service::CategoryService, deal_service::DealService,
        ingest::IngestService, restaurant_service::RestaurantService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub restaurant_service: RestaurantService,
    pub deal_service: DealService,
    pub category_service: CategoryService,
    pub ingest_service: IngestService,
    pub auth_service: AuthService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        // A pool é o único estado compartilhado entre requisições; tudo o
        // mais é injetado, nada de singletons de módulo.
        let restaurant_repo = RestaurantRepository::new(db_pool.clone());
        let deal_repo = DealRepository::new(db_pool.clone());
        let category_repo = CategoryRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());

        let restaurant_service = RestaurantService::new(restaurant_repo, category_repo.clone());
        let deal_service = DealService::new(deal_repo);
        let category_service = CategoryService::new(category_repo);
        let ingest_service = IngestService::new(restaurant_service.clone());
        let auth_service = AuthService::new(user_repo);

        Ok(Self {
            db_pool,
            restaurant_service,
            deal_service,
            category_service,
            ingest_service,
            auth_service,
        })
    }
}
