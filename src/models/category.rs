// src/models/category.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

// Uma categoria pertence a exatamente um restaurante; o conjunto é
// substituído por inteiro no update do restaurante (replace-all).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RestaurantCategory {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub restaurant_id: i64,
    pub category_name: String,
}
