pub mod auth;
pub mod category;
pub mod deal;
pub mod restaurant;
