#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Europe::Bucharest;
use gym_lottery::config::LotteryConfig;
use gym_lottery::models::RegistrationRequest;
use gym_lottery::services::LotteryService;
use gym_lottery::utils::{EntrantShuffler, SeededShuffler};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    // a single connection keeps every query on the same in-memory database
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to create memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// File-backed database shared by a real multi-connection pool. The file
/// lives in the temp dir and is removed when the guard drops.
pub struct FileDb {
    pub db: DatabaseConnection,
    path: PathBuf,
}

impl Drop for FileDb {
    fn drop(&mut self) {
        remove_db_files(&self.path);
    }
}

fn remove_db_files(path: &Path) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

pub async fn setup_file_db(name: &str, max_connections: u32) -> FileDb {
    let path = std::env::temp_dir().join(format!(
        "gym-lottery-{name}-{}.db",
        std::process::id()
    ));
    remove_db_files(&path);

    let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    options
        .max_connections(max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to create file database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    FileDb { db, path }
}

pub fn service_with(db: DatabaseConnection, shuffler: Arc<dyn EntrantShuffler>) -> LotteryService {
    LotteryService::new(db, &LotteryConfig::default(), shuffler).expect("valid lottery config")
}

pub async fn seeded_service(seed: u64) -> LotteryService {
    service_with(setup_test_db().await, Arc::new(SeededShuffler::new(seed)))
}

/// Wall-clock time in Bucharest, as UTC.
pub fn bucharest(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Bucharest
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn request(student_id: &str, first_name: &str, last_name: &str) -> RegistrationRequest {
    RegistrationRequest {
        student_id: student_id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

pub async fn register_many(service: &LotteryService, count: usize, now: DateTime<Utc>) {
    for i in 0..count {
        service
            .register(&request(&format!("S{i:03}"), "Student", &format!("No{i}")), now)
            .await
            .expect("registration accepted");
    }
}
