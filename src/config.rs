use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub operator: OperatorConfig,
    #[serde(default)]
    pub lottery: LotteryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64, // seconds
}

/// The single dashboard operator allowed into the admin routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// bcrypt hash; an empty value disables operator login
    #[serde(default)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryConfig {
    /// IANA zone the Monday boundary is computed in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_draw_hour")]
    pub draw_hour: u32,
    #[serde(default = "default_winner_slots")]
    pub winner_slots: usize,
    #[serde(default = "default_reserve_slots")]
    pub reserve_slots: usize,
    /// How often the background task checks whether a draw is due
    #[serde(default = "default_poll_seconds")]
    pub poll_interval_secs: u64,
}

fn default_timezone() -> String {
    "Europe/Bucharest".to_string()
}

fn default_draw_hour() -> u32 {
    5
}

fn default_winner_slots() -> usize {
    15
}

fn default_reserve_slots() -> usize {
    10
}

fn default_poll_seconds() -> u64 {
    60
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            draw_hour: default_draw_hour(),
            winner_slots: default_winner_slots(),
            reserve_slots: default_reserve_slots(),
            poll_interval_secs: default_poll_seconds(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // no file: build everything from environment variables and defaults
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: get_env("DATABASE_URL")
                            .unwrap_or_else(|| "sqlite://app.db?mode=rwc".to_string()),
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 5u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse(
                            "JWT_ACCESS_EXPIRES_IN",
                            30 * 24 * 3600i64,
                        ),
                    },
                    operator: OperatorConfig {
                        username: get_env("OPERATOR_USERNAME")
                            .unwrap_or_else(|| "admin".to_string()),
                        name: get_env("OPERATOR_NAME").unwrap_or_else(|| "Operator".to_string()),
                        email: get_env("OPERATOR_EMAIL").unwrap_or_default(),
                        password_hash: get_env("OPERATOR_PASSWORD_HASH").unwrap_or_default(),
                    },
                    lottery: LotteryConfig {
                        timezone: get_env("LOTTERY_TIMEZONE").unwrap_or_else(default_timezone),
                        draw_hour: get_env_parse("LOTTERY_DRAW_HOUR", default_draw_hour()),
                        winner_slots: get_env_parse("LOTTERY_WINNER_SLOTS", default_winner_slots()),
                        reserve_slots: get_env_parse(
                            "LOTTERY_RESERVE_SLOTS",
                            default_reserve_slots(),
                        ),
                        poll_interval_secs: get_env_parse(
                            "LOTTERY_POLL_SECONDS",
                            default_poll_seconds(),
                        ),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Unable to read config file {config_path}: {e}").into());
            }
        };

        // env vars win even when the file exists
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("OPERATOR_USERNAME") {
            config.operator.username = v;
        }
        if let Ok(v) = env::var("OPERATOR_NAME") {
            config.operator.name = v;
        }
        if let Ok(v) = env::var("OPERATOR_EMAIL") {
            config.operator.email = v;
        }
        if let Ok(v) = env::var("OPERATOR_PASSWORD_HASH") {
            config.operator.password_hash = v;
        }
        if let Ok(v) = env::var("LOTTERY_TIMEZONE") {
            config.lottery.timezone = v;
        }
        if let Ok(v) = env::var("LOTTERY_DRAW_HOUR")
            && let Ok(h) = v.parse()
        {
            config.lottery.draw_hour = h;
        }
        if let Ok(v) = env::var("LOTTERY_WINNER_SLOTS")
            && let Ok(n) = v.parse()
        {
            config.lottery.winner_slots = n;
        }
        if let Ok(v) = env::var("LOTTERY_RESERVE_SLOTS")
            && let Ok(n) = v.parse()
        {
            config.lottery.reserve_slots = n;
        }
        if let Ok(v) = env::var("LOTTERY_POLL_SECONDS")
            && let Ok(n) = v.parse()
        {
            config.lottery.poll_interval_secs = n;
        }

        Ok(config)
    }
}
