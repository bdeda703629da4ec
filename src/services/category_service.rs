// src/services/category_service.rs

use std::collections::HashMap;

use crate::{
    common::error::AppError,
    common::timeout::{run_with_deadline, DB_DEADLINE_MS},
    db::CategoryRepository,
    models::category::RestaurantCategory,
};

#[derive(Clone)]
pub struct CategoryService {
    categories: CategoryRepository,
}

impl CategoryService {
    pub fn new(categories: CategoryRepository) -> Self {
        Self { categories }
    }

    pub async fn list_all(&self) -> Result<Vec<RestaurantCategory>, AppError> {
        let repo = self.categories.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.list_all().await }).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<RestaurantCategory>, AppError> {
        let repo = self.categories.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.find_by_id(id).await }).await
    }

    pub async fn names_by_restaurant(&self, restaurant_id: i64) -> Result<Vec<String>, AppError> {
        let repo = self.categories.clone();
        run_with_deadline(DB_DEADLINE_MS, async move {
            repo.names_by_restaurant(restaurant_id).await
        })
        .await
    }

    pub async fn names_grouped(&self) -> Result<HashMap<i64, Vec<String>>, AppError> {
        let repo = self.categories.clone();
        run_with_deadline(DB_DEADLINE_MS, async move { repo.names_grouped().await }).await
    }
}
