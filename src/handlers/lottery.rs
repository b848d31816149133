use crate::models::*;
use crate::services::LotteryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Utc;

#[utoipa::path(
    get,
    path = "/lottery/overview",
    tag = "lottery",
    responses(
        (status = 200, description = "Current winners, countdown and next-week registrations", body = LotteryOverviewResponse),
        (status = 500, description = "Database error")
    )
)]
/// Weekly management page: runs the draw if it is due, then returns
/// the current week's results and the registration state of next week
pub async fn get_overview(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.overview(Utc::now()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/lottery/window",
    tag = "lottery",
    responses(
        (status = 200, description = "Current and next draw boundaries", body = DrawWindowResponse)
    )
)]
pub async fn get_window(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    let window = service.draw_window(Utc::now());
    Ok(HttpResponse::Ok().json(ApiResponse::success(DrawWindowResponse::from(&window))))
}

#[utoipa::path(
    get,
    path = "/lottery/winners",
    tag = "lottery",
    params(WinnersQuery),
    responses(
        (status = 200, description = "Winners and reserves of a draw", body = WinnersResponse)
    )
)]
/// Results of one draw (defaults to the current window)
pub async fn get_winners(
    service: web::Data<LotteryService>,
    query: web::Query<WinnersQuery>,
) -> Result<HttpResponse> {
    let draw_time = query
        .draw_time
        .unwrap_or_else(|| service.draw_window(Utc::now()).current_key());
    match service.results_for(draw_time).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/lottery/registrations",
    tag = "lottery",
    responses(
        (status = 200, description = "Registrations for the next draw, newest first", body = [RegistrationResponse])
    )
)]
pub async fn list_registrations(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    let draw_time = service.draw_window(Utc::now()).next_key();
    match service.registrations_for(draw_time).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/lottery/registrations",
    tag = "lottery",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Registration successful", body = RegistrationResponse),
        (status = 400, description = "Empty or oversized field"),
        (status = 409, description = "Student already registered for next week")
    )
)]
pub async fn register(
    service: web::Data<LotteryService>,
    request: web::Json<RegistrationRequest>,
) -> Result<HttpResponse> {
    match service.register(&request.into_inner(), Utc::now()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            data,
            "Registration successful!".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn lottery_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lottery")
            .route("/overview", web::get().to(get_overview))
            .route("/window", web::get().to(get_window))
            .route("/winners", web::get().to(get_winners))
            .route("/registrations", web::get().to(list_registrations))
            .route("/registrations", web::post().to(register)),
    );
}
