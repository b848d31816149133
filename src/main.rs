use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use gym_lottery::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::{JwtService, ThreadRngShuffler, hash_password},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // `gym-lottery hash-password <password>` prints a value for OPERATOR_PASSWORD_HASH
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let Some(password) = args.get(2) else {
            eprintln!("usage: gym-lottery hash-password <password>");
            std::process::exit(2);
        };
        let hashed = hash_password(password).map_err(std::io::Error::other)?;
        println!("{hashed}");
        return Ok(());
    }

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    let auth_service = AuthService::new(config.operator.clone(), jwt_service.clone());
    let lottery_service =
        LotteryService::new(pool.clone(), &config.lottery, Arc::new(ThreadRngShuffler))
            .expect("Invalid lottery configuration");

    if config.operator.password_hash.is_empty() {
        log::warn!("OPERATOR_PASSWORD_HASH is not set; admin routes are unreachable");
    }

    tasks::spawn_all(lottery_service.clone(), config.lottery.poll_interval_secs);

    log::info!(
        "Starting HTTP server at {}:{} (draw timezone {})",
        config.server.host,
        config.server.port,
        config.lottery.timezone
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(lottery_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::lottery_config)
                    .configure(handlers::auth_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
