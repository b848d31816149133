use crate::models::*;
use crate::services::LotteryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Utc;

#[utoipa::path(
    post,
    path = "/admin/draw",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Draw executed or skipped", body = DrawOutcome),
        (status = 401, description = "Unauthorized")
    )
)]
/// Run the current week's draw now (no-op if already drawn)
pub async fn run_draw(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.run_draw_if_due(Utc::now()).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(outcome))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/registrations",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All registrations for next week deleted", body = ClearRegistrationsResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn clear_registrations(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.clear_registrations(Utc::now()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            data,
            "All registrations for next week have been deleted.".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/winners/dummy",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Dummy winners populated", body = DummyWinnersResponse),
        (status = 401, description = "Unauthorized")
    )
)]
/// Testing override: replace this week's results with fixed dummy entries
pub async fn populate_dummy_winners(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.populate_dummy_winners(Utc::now()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            data,
            "Dummy winners populated (Free & Reserve lists updated).".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/draw", web::post().to(run_draw))
            .route("/registrations", web::delete().to(clear_registrations))
            .route("/winners/dummy", web::post().to(populate_dummy_winners)),
    );
}
