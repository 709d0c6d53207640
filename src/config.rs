use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::{env, fmt::Display, str::FromStr};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    /// Mount point of the protected routes; empty serves them at the root.
    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn or_default<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value '{raw}': {e}"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            db_max_connections: or_default("DB_MAX_CONNECTIONS", "10")?,
            access_token_ttl: or_default("ACCESS_TOKEN_TTL", "900")?, // default 15 min

            rate_login_per_min: or_default("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: or_default("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: env::var("API_PREFIX").unwrap_or_default(),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: or_default("LOG_LEVEL", "debug")?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "mysql://localhost/test".into(),
            db_max_connections: 1,
            jwt_secret: "test-secret".into(),
            server_addr: "127.0.0.1:0".into(),
            access_token_ttl: 60,
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: String::new(),
            log_dir: "logs".into(),
            log_level: tracing::Level::DEBUG,
        }
    }
}
