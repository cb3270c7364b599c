//! Configuration types and loading
//!
//! Values come from the environment (a `.env` file is loaded by the server
//! binary before [`AppConfig::from_env`] runs). Anything unset keeps its default.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Database configuration
    pub database: DatabaseSettings,

    /// Server configuration
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Staffing-domain presentation settings
    pub staffing: StaffingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    /// Empty means "no database": the server runs on the in-memory store
    pub url: String,
    pub pool_size: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HMAC secret for JWT validation
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaffingConfig {
    /// Prefix of the placeholder avatar; the resource id is appended
    pub avatar_placeholder_url: String,
    /// Group name for resources without a pole
    pub unassigned_pole_name: String,
}

impl Default for StaffingConfig {
    fn default() -> Self {
        Self {
            avatar_placeholder_url: "https://i.pravatar.cc/150?img=".to_string(),
            unassigned_pole_name: "Unassigned".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                url: String::new(),
                pool_size: 10,
                run_migrations: true,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout_seconds: 30,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production".to_string(),
            },
            staffing: StaffingConfig::default(),
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(size) = std::env::var("DATABASE_POOL_SIZE") {
            config.database.pool_size = parse_var("DATABASE_POOL_SIZE", &size)?;
        }
        if let Ok(v) = std::env::var("DATABASE_RUN_MIGRATIONS") {
            config.database.run_migrations = parse_bool(&v);
        }

        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = parse_var("PORT", &port)?;
        }
        if let Ok(timeout) = std::env::var("REQUEST_TIMEOUT_SECONDS") {
            config.server.request_timeout_seconds = parse_var("REQUEST_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }

        if let Ok(url) = std::env::var("STAFF_AVATAR_PLACEHOLDER_URL") {
            config.staffing.avatar_placeholder_url = url;
        }
        if let Ok(name) = std::env::var("STAFF_UNASSIGNED_POLE_NAME") {
            config.staffing.unassigned_pole_name = name;
        }

        Ok(config)
    }

    /// Whether a database URL was configured
    pub fn has_database(&self) -> bool {
        !self.database.url.trim().is_empty()
    }

    /// Get the server address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::SocketAddr;
        let ip: std::net::IpAddr = self.server.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(ip, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "true" | "1" | "yes")
}
