//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::verify_admin;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas do catálogo
    let public_routes = Router::new()
        .route("/restaurants", get(handlers::restaurants::get_all_restaurants))
        .route("/deals", get(handlers::deals::get_all_deals))
        .route("/deals/{restaurant_id}", get(handlers::deals::get_deals_by_restaurant))
        .route("/categories", get(handlers::categories::get_all_categories))
        .route("/categories/{id}", get(handlers::categories::get_category_by_id))
        .route("/users/me", get(handlers::users::get_me));

    // Rotas administrativas (todas atrás do verify_admin)
    let admin_routes = Router::new()
        .route("/restaurants/bulk-upload", post(handlers::admin::bulk_upload_restaurants))
        .route("/restaurants"
               ,get(handlers::admin::list_restaurants)
               .post(handlers::admin::create_restaurant)
        )
        .route("/restaurants/{id}"
               ,get(handlers::admin::get_restaurant)
               .put(handlers::admin::update_restaurant)
               .delete(handlers::admin::delete_restaurant)
        )
        .route("/deals"
               ,get(handlers::admin::list_deals)
               .post(handlers::admin::create_deal)
        )
        .route("/deals/{id}"
               ,get(handlers::admin::get_deal)
               .put(handlers::admin::update_deal)
               .delete(handlers::admin::delete_deal)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            verify_admin,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", public_routes)
        .nest("/api/admin", admin_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
