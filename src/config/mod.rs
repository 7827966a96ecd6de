//! Configuration module for the classroom backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! The resulting [`Config`] is built once at startup and handed to the router state.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Bearer token settings; `None` leaves protected endpoints closed
    pub auth: Option<AuthConfig>,
    /// Skip permission checks when no token secret is set (local development only)
    pub auth_disabled: bool,
}

/// Settings for verifying bearer tokens on protected drink endpoints.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HS256 secret
    pub jwt_secret: String,
    pub audience: Option<String>,
    pub issuer: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("CLASSROOM_DB_PATH")
            .unwrap_or_else(|_| "./data/classroom.sqlite".to_string())
            .into();

        let bind_addr_raw =
            env::var("CLASSROOM_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
        let bind_addr = bind_addr_raw.parse().map_err(|e| {
            AppError::Config(format!(
                "Invalid CLASSROOM_BIND_ADDR '{}': {}",
                bind_addr_raw, e
            ))
        })?;

        let log_level = env::var("CLASSROOM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env_flag("CLASSROOM_LOG_JSON");
        let auth_disabled = env_flag("CLASSROOM_AUTH_DISABLED");

        let auth = env::var("CLASSROOM_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|jwt_secret| AuthConfig {
                jwt_secret,
                audience: env::var("CLASSROOM_JWT_AUDIENCE").ok(),
                issuer: env::var("CLASSROOM_JWT_ISSUER").ok(),
            });

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_json,
            auth,
            auth_disabled,
        })
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases touch the same process-wide variables, so they run in one test.
    #[test]
    fn test_from_env() {
        for key in [
            "CLASSROOM_DB_PATH",
            "CLASSROOM_BIND_ADDR",
            "CLASSROOM_LOG_LEVEL",
            "CLASSROOM_LOG_JSON",
            "CLASSROOM_JWT_SECRET",
            "CLASSROOM_JWT_AUDIENCE",
            "CLASSROOM_JWT_ISSUER",
            "CLASSROOM_AUTH_DISABLED",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/classroom.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(config.auth.is_none());
        assert!(!config.auth_disabled);

        env::set_var("CLASSROOM_AUTH_DISABLED", "TRUE");
        assert!(Config::from_env().unwrap().auth_disabled);
        env::remove_var("CLASSROOM_AUTH_DISABLED");

        env::set_var("CLASSROOM_BIND_ADDR", "not-an-address");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        env::set_var("CLASSROOM_BIND_ADDR", "0.0.0.0:8080");
        env::set_var("CLASSROOM_JWT_SECRET", "s3cret");
        env::set_var("CLASSROOM_JWT_AUDIENCE", "coffee");
        let config = Config::from_env().unwrap();
        let auth = config.auth.expect("auth configured");
        assert_eq!(auth.jwt_secret, "s3cret");
        assert_eq!(auth.audience.as_deref(), Some("coffee"));
        assert!(auth.issuer.is_none());

        env::remove_var("CLASSROOM_BIND_ADDR");
        env::remove_var("CLASSROOM_JWT_SECRET");
        env::remove_var("CLASSROOM_JWT_AUDIENCE");
    }
}
