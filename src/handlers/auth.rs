use crate::error::AppError;
use crate::middlewares::current_operator;
use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Username or password is incorrect")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Logged-in operator", body = OperatorResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let Some(operator) = current_operator(&req) else {
        return Ok(AppError::AuthError("Missing access token".to_string()).error_response());
    };
    match auth_service.profile(&operator.username).await {
        Ok(profile) => {
            let message = format!("Welcome {}!", profile.name);
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(profile, message)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout() -> Result<HttpResponse> {
    // tokens are stateless; the client drops its copy
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        (),
        "Logged out".to_string(),
    )))
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me))
            .route("/logout", web::post().to(logout)),
    );
}
