use crate::config::OperatorConfig;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;

/// Operator login for the admin routes. There is exactly one account and
/// it lives in configuration, not in the database.
#[derive(Clone)]
pub struct AuthService {
    operator: OperatorConfig,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(operator: OperatorConfig, jwt_service: JwtService) -> Self {
        Self {
            operator,
            jwt_service,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        if self.operator.password_hash.is_empty() {
            return Err(AppError::AuthError(
                "Operator login is not configured".to_string(),
            ));
        }

        let username_ok = request.username.trim() == self.operator.username;
        let password_ok = verify_password(&request.password, &self.operator.password_hash)?;
        if !username_ok || !password_ok {
            return Err(AppError::AuthError(
                "Username or password is incorrect".to_string(),
            ));
        }

        let access_token = self
            .jwt_service
            .generate_access_token(&self.operator.username, &self.operator.name)?;
        log::info!("Operator {} logged in", self.operator.username);

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
            operator: OperatorResponse::from(&self.operator),
        })
    }

    pub async fn profile(&self, username: &str) -> AppResult<OperatorResponse> {
        if username != self.operator.username {
            return Err(AppError::NotFound("Operator not found".to_string()));
        }
        Ok(OperatorResponse::from(&self.operator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(password_hash: String) -> AuthService {
        AuthService::new(
            OperatorConfig {
                username: "coach".to_string(),
                name: "Head Coach".to_string(),
                email: "coach@gym.test".to_string(),
                password_hash,
            },
            JwtService::new("test-secret", 3600),
        )
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_token() {
        let svc = service(bcrypt::hash("Climb2025", 4).unwrap());
        let res = svc.login(login("coach", "Climb2025")).await.unwrap();
        assert_eq!(res.token_type, "Bearer");
        assert_eq!(res.operator.name, "Head Coach");

        let claims = JwtService::new("test-secret", 3600)
            .verify_access_token(&res.access_token)
            .unwrap();
        assert_eq!(claims.sub, "coach");
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let svc = service(bcrypt::hash("Climb2025", 4).unwrap());
        assert!(matches!(
            svc.login(login("coach", "wrong")).await,
            Err(AppError::AuthError(_))
        ));
        assert!(matches!(
            svc.login(login("someone", "Climb2025")).await,
            Err(AppError::AuthError(_))
        ));
    }

    #[tokio::test]
    async fn test_login_disabled_without_hash() {
        let svc = service(String::new());
        assert!(matches!(
            svc.login(login("coach", "")).await,
            Err(AppError::AuthError(_))
        ));
    }

    #[tokio::test]
    async fn test_profile() {
        let svc = service(String::new());
        assert_eq!(svc.profile("coach").await.unwrap().email, "coach@gym.test");
        assert!(matches!(
            svc.profile("other").await,
            Err(AppError::NotFound(_))
        ));
    }
}
