use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Secret used when JWT_SECRET is not provided. Rejected in production.
pub const DEV_JWT_SECRET: &str = "landing-dev-secret-change-me";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Overrides the scheme://host derived from each request when building image URLs.
    pub public_base_url: Option<String>,
    /// Honour X-Forwarded-Host/Proto. Only enable behind a proxy that sets them.
    pub trust_proxy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. When absent the in-memory store is used.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub directory: PathBuf,
    pub max_file_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
    pub admin_email: String,
    pub admin_password: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set outside development")]
    InsecureJwtSecret,
    #[error("ADMIN_PASSWORD must be set outside development")]
    MissingAdminPassword,
    #[error("UPLOAD_MAX_FILE_SIZE_BYTES must be greater than zero")]
    InvalidUploadLimit,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("LANDING_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("PUBLIC_BASE_URL") {
            let trimmed = v.trim().trim_end_matches('/');
            self.server.public_base_url = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Ok(v) = env::var("TRUST_PROXY") {
            self.server.trust_proxy = matches!(v.trim(), "1" | "true" | "yes");
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = (!v.trim().is_empty()).then_some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Upload overrides
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.uploads.directory = PathBuf::from(v);
        }
        if let Ok(v) = env::var("UPLOAD_MAX_FILE_SIZE_BYTES") {
            self.uploads.max_file_size_bytes = v.parse().unwrap_or(self.uploads.max_file_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("ADMIN_EMAIL") {
            self.security.admin_email = v.trim().to_lowercase();
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.security.admin_password = (!v.is_empty()).then_some(v);
        }

        self
    }

    /// Reject combinations that are only acceptable on a developer machine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uploads.max_file_size_bytes == 0 {
            return Err(ConfigError::InvalidUploadLimit);
        }
        if matches!(self.environment, Environment::Development) {
            return Ok(());
        }
        if self.security.jwt_secret.is_empty() || self.security.jwt_secret == DEV_JWT_SECRET {
            return Err(ConfigError::InsecureJwtSecret);
        }
        if self.security.admin_password.is_none() {
            return Err(ConfigError::MissingAdminPassword);
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 5000,
                public_base_url: None,
                trust_proxy: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            uploads: UploadConfig {
                directory: PathBuf::from("uploads"),
                max_file_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cors_origins: vec!["*".to_string()],
                admin_email: "admin@example.com".to_string(),
                admin_password: Some("admin123".to_string()),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 5000,
                public_base_url: None,
                trust_proxy: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            uploads: UploadConfig {
                directory: PathBuf::from("uploads"),
                max_file_size_bytes: 5 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                cors_origins: vec!["https://staging.example.com".to_string()],
                admin_email: "admin@example.com".to_string(),
                admin_password: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 5000,
                public_base_url: None,
                trust_proxy: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            uploads: UploadConfig {
                directory: PathBuf::from("uploads"),
                max_file_size_bytes: 5 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                cors_origins: vec!["https://example.com".to_string()],
                admin_email: "admin@example.com".to_string(),
                admin_password: None,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
