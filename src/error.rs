use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, RuntimeErr};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// True for SQLITE_BUSY / SQLITE_LOCKED, including extended codes such as
/// SQLITE_BUSY_SNAPSHOT (517). The primary code is the low byte.
pub(crate) fn is_busy_code(code: &str) -> bool {
    code.parse::<i32>()
        .map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

impl AppError {
    /// Lock contention reported by SQLite, worth retrying.
    pub fn is_storage_busy(&self) -> bool {
        let AppError::DatabaseError(err) = self else {
            return false;
        };
        let runtime = match err {
            DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
            _ => return false,
        };
        match runtime {
            RuntimeErr::SqlxError(sqlx::Error::Database(db)) => {
                db.code().is_some_and(|code| is_busy_code(&code))
            }
            _ => false,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyRegistered(_) => StatusCode::CONFLICT,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::AlreadyRegistered(msg) => {
                log::info!("Duplicate registration: {msg}");
                ("ALREADY_REGISTERED", msg.clone())
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                ("AUTH_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                ("DATABASE_ERROR", "Database error".to_string())
            }
            _ => {
                log::error!("Internal error: {self}");
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::ValidationError("empty".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AlreadyRegistered("S1".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::AuthError("nope".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::DatabaseError(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[derive(Debug, Error)]
    #[error("{message}")]
    struct SqliteFailure {
        code: &'static str,
        message: String,
    }

    impl sqlx::error::DatabaseError for SqliteFailure {
        fn message(&self) -> &str {
            &self.message
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(std::borrow::Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn sqlite_exec_error(code: &'static str, message: &str) -> AppError {
        let failure = SqliteFailure {
            code,
            message: message.to_string(),
        };
        AppError::DatabaseError(DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(
            Box::new(failure),
        ))))
    }

    #[test]
    fn test_is_busy_code() {
        assert!(is_busy_code("5"));
        assert!(is_busy_code("6"));
        assert!(is_busy_code("517")); // SQLITE_BUSY_SNAPSHOT
        assert!(is_busy_code("262")); // SQLITE_LOCKED_SHAREDCACHE
        assert!(!is_busy_code("19")); // SQLITE_CONSTRAINT
        assert!(!is_busy_code("2067")); // SQLITE_CONSTRAINT_UNIQUE
        assert!(!is_busy_code("not-a-code"));
    }

    #[test]
    fn test_is_storage_busy() {
        assert!(sqlite_exec_error("5", "database is locked").is_storage_busy());
        assert!(sqlite_exec_error("517", "any wording").is_storage_busy());
        assert!(!sqlite_exec_error("2067", "UNIQUE constraint failed").is_storage_busy());
        // only the result code counts, not the message
        assert!(!AppError::DatabaseError(DbErr::Custom("database is locked".into())).is_storage_busy());
        assert!(!AppError::ValidationError("database is locked".into()).is_storage_busy());
    }
}
