/// Configuration management for the API server
///
/// Loaded from environment variables, with a `.env` file picked up in
/// development.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `API_CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `API_PRODUCTION`: Enables HSTS (default: false)
/// - `STORE_BACKEND`: `postgres` or `memory` (default: postgres)
/// - `DATABASE_URL`: PostgreSQL connection string (required for postgres)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DATABASE_OPERATION_TIMEOUT_MS`: Per-call timeout (default: 5000)
/// - `DATABASE_RUN_MIGRATIONS`: Apply migrations at startup (default: true)
/// - `APP_TITLE`, `APP_DESCRIPTION`, `APP_CONTACT_NAME`, `APP_CONTACT_EMAIL`:
///   metadata published in the OpenAPI document
/// - `RUST_LOG`: Log filter; `LOG_FORMAT=json` for JSON output
///
/// # Example
///
/// ```no_run
/// use taskman_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Storage configuration
    pub database: DatabaseConfig,

    /// Metadata published with the API
    pub app: AppMetadata,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` means any
    pub cors_origins: Vec<String>,

    /// Production mode (HSTS on)
    pub production: bool,
}

/// Which store implementation serves requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("Unknown STORE_BACKEND '{}', expected 'postgres' or 'memory'", other),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,

    /// PostgreSQL connection URL; empty for the memory backend
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Upper bound for acquiring a session and for each store call
    pub operation_timeout_ms: u64,

    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

/// Application metadata for the OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    pub title: String,
    pub description: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            title: "Task Manager".to_string(),
            description: "Web application that provides an API for working with a task management system."
                .to_string(),
            contact_name: None,
            contact_email: None,
        }
    }
}

fn parse_var<T>(name: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", name, e))
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` is missing while the postgres backend is selected
    /// - A variable has an invalid value
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var::<u16>("API_PORT", "8080")?;
        let cors_origins = env::var("API_CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let production = parse_var::<bool>("API_PRODUCTION", "false")?;

        let backend = parse_var::<StoreBackend>("STORE_BACKEND", "postgres")?;
        let url = match backend {
            StoreBackend::Postgres => env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            StoreBackend::Memory => String::new(),
        };
        let max_connections = parse_var::<u32>("DATABASE_MAX_CONNECTIONS", "10")?;
        let operation_timeout_ms = parse_var::<u64>("DATABASE_OPERATION_TIMEOUT_MS", "5000")?;
        if operation_timeout_ms == 0 {
            anyhow::bail!("DATABASE_OPERATION_TIMEOUT_MS must be greater than zero");
        }
        let run_migrations = parse_var::<bool>("DATABASE_RUN_MIGRATIONS", "true")?;

        let defaults = AppMetadata::default();
        let app = AppMetadata {
            title: env::var("APP_TITLE").unwrap_or(defaults.title),
            description: env::var("APP_DESCRIPTION").unwrap_or(defaults.description),
            contact_name: env::var("APP_CONTACT_NAME").ok(),
            contact_email: env::var("APP_CONTACT_EMAIL").ok(),
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                backend,
                url,
                max_connections,
                operation_timeout_ms,
                run_migrations,
            },
            app,
        })
    }

    /// In-memory configuration for tests and local experiments
    pub fn in_memory() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                url: String::new(),
                max_connections: 1,
                operation_timeout_ms: 5000,
                run_migrations: false,
            },
            app: AppMetadata::default(),
        }
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let mut config = Config::in_memory();
        config.api.port = 8080;

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_operation_timeout() {
        let config = Config::in_memory();
        assert_eq!(config.database.operation_timeout(), Duration::from_secs(5));
    }
}
