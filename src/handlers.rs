pub mod admin;
pub mod categories;
pub mod deals;
pub mod restaurants;
pub mod users;
