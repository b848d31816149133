pub mod auth_service;
pub mod lottery_service;

pub use auth_service::*;
pub use lottery_service::*;
