pub mod admin;
pub mod auth;
pub mod lottery;

pub use admin::admin_config;
pub use auth::auth_config;
pub use lottery::lottery_config;
