pub mod auth;
pub mod category_service;
pub mod deal_service;
pub mod ingest;
pub mod restaurant_service;
