//! Configuration management for vendor_admin
//!
//! Loads the app configuration from environment variables with
//! sensible defaults, then validates it.

use crate::types::{AppConfig, DatabaseConfig, ServerConfig, StartupError};
use std::env;
use std::time::Duration;

/// Load complete app configuration
pub fn load_config() -> Result<AppConfig, StartupError> {
    let defaults = AppConfig::default();
    let config = AppConfig {
        server: load_server_config(&defaults.server),
        database: load_database_config(&defaults.database),
        cors_origins: load_cors_origins(),
        session_ttl_hours: parse_var("SESSION_TTL_HOURS").unwrap_or(defaults.session_ttl_hours),
    };

    validate_config(&config)?;
    Ok(config)
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Load server configuration
fn load_server_config(defaults: &ServerConfig) -> ServerConfig {
    ServerConfig {
        host: env::var("SERVER_HOST").unwrap_or_else(|_| defaults.host.clone()),
        port: parse_var("SERVER_PORT").unwrap_or(defaults.port),
        workers: parse_var("SERVER_WORKERS").unwrap_or(defaults.workers),
    }
}

/// Load database configuration
fn load_database_config(defaults: &DatabaseConfig) -> DatabaseConfig {
    DatabaseConfig {
        url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
        max_connections: parse_var("PG_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
        connect_timeout: parse_var("PG_CONNECT_TIMEOUT")
            .map(Duration::from_secs)
            .unwrap_or(defaults.connect_timeout),
    }
}

/// Load CORS origins
fn load_cors_origins() -> Vec<String> {
    env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "*".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<(), StartupError> {
    if config.server.port == 0 {
        return Err(StartupError::Config("Server port must be between 1 and 65,535".to_string()));
    }

    if config.server.workers == 0 {
        return Err(StartupError::Config("Server workers must be at least 1".to_string()));
    }

    if config.database.max_connections == 0 {
        return Err(StartupError::Config("PG_MAX_CONNECTIONS must be at least 1".to_string()));
    }

    if config.session_ttl_hours <= 0 {
        return Err(StartupError::Config("SESSION_TTL_HOURS must be positive".to_string()));
    }

    if config.cors_origins.is_empty() {
        return Err(StartupError::Config("CORS_ORIGINS can't be empty".to_string()));
    }

    Ok(())
}
