pub mod auth;
pub mod common;
pub mod lottery;

pub use auth::*;
pub use common::*;
pub use lottery::*;
