use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_secs: usize,
    pub server_addr: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: tracing::Level,

    pub leave_type_cache_ttl_secs: u64,

    // Push delivery. Disabled unless both are set.
    pub fcm_endpoint: Option<String>,
    pub fcm_access_token: Option<String>,
    pub fcm_timeout_secs: u64,
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn optional(key: &'static str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 10)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_secs: parsed("JWT_TTL_SECS", 8 * 60 * 60)?, // 8h

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: optional("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            log_dir: optional("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parsed("LOG_LEVEL", tracing::Level::DEBUG)?,

            leave_type_cache_ttl_secs: parsed("LEAVE_TYPE_CACHE_TTL_SECS", 300)?,

            fcm_endpoint: optional("FCM_ENDPOINT"),
            fcm_access_token: optional("FCM_ACCESS_TOKEN"),
            fcm_timeout_secs: parsed("FCM_TIMEOUT_SECS", 10)?,
        })
    }

    /// Endpoint and access token, when both are set.
    pub fn fcm_credentials(&self) -> Option<(&str, &str)> {
        self.fcm_endpoint.as_deref().zip(self.fcm_access_token.as_deref())
    }

    pub fn push_enabled(&self) -> bool {
        self.fcm_credentials().is_some()
    }
}

#[cfg(test)]
impl Config {
    pub fn test() -> Self {
        Self {
            database_url: "mysql://localhost/leave_test".into(),
            db_max_connections: 1,
            jwt_secret: "test-secret".into(),
            jwt_ttl_secs: 3600,
            server_addr: "127.0.0.1:0".into(),
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api".into(),
            log_dir: "logs".into(),
            log_level: tracing::Level::DEBUG,
            leave_type_cache_ttl_secs: 300,
            fcm_endpoint: None,
            fcm_access_token: None,
            fcm_timeout_secs: 10,
        }
    }
}
