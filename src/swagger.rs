use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::WinnerCategory;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::lottery::get_overview,
        handlers::lottery::get_window,
        handlers::lottery::get_winners,
        handlers::lottery::list_registrations,
        handlers::lottery::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::logout,
        handlers::admin::run_draw,
        handlers::admin::clear_registrations,
        handlers::admin::populate_dummy_winners,
    ),
    components(
        schemas(
            RegistrationRequest,
            RegistrationResponse,
            WinnerCategory,
            WinnerResponse,
            WinnersQuery,
            WinnersResponse,
            DrawWindowResponse,
            CountdownResponse,
            DrawOutcome,
            LotteryOverviewResponse,
            ClearRegistrationsResponse,
            DummyWinnersResponse,
            LoginRequest,
            AuthResponse,
            OperatorResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "lottery", description = "Weekly draw and registration API"),
        (name = "auth", description = "Operator authentication API"),
        (name = "admin", description = "Operator tools"),
    ),
    info(
        title = "Climbing Gym Weekly Lottery API",
        version = "1.0.0",
        description = "Weekly free-access draw and registration management"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_lottery_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/lottery/overview"));
        assert!(doc.paths.paths.contains_key("/admin/winners/dummy"));
    }
}
