pub mod geo;

pub mod category_repo;
pub use category_repo::CategoryRepository;
pub mod deal_repo;
pub use deal_repo::DealRepository;
pub mod restaurant_repo;
pub use restaurant_repo::RestaurantRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
