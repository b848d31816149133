use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::OperatorConfig;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperatorResponse {
    pub username: String,
    pub name: String,
    pub email: String,
}

impl From<&OperatorConfig> for OperatorResponse {
    fn from(c: &OperatorConfig) -> Self {
        OperatorResponse {
            username: c.username.clone(),
            name: c.name.clone(),
            email: c.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub operator: OperatorResponse,
}
