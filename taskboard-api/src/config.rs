/// Configuration management for the API server
///
/// Configuration is read from environment variables (and a `.env` file when
/// present).
///
/// # Environment Variables
///
/// - `APP_ENV`: `development` (default), `test` or `production`
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 3000)
/// - `STORAGE_BACKEND`: `postgres` (default) or `memory`
/// - `DATABASE_URL`: PostgreSQL connection string (required for `postgres`)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `RUN_MIGRATIONS`: Apply embedded migrations on start-up (default: true)
/// - `LOG_FORMAT`: `pretty` (default) or `json`
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
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
use taskboard_shared::db::pool;

/// Operating mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// Production suppresses diagnostic logging of unhandled errors
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => anyhow::bail!("Unknown APP_ENV '{}'", other),
        }
    }
}

/// Where entities are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown STORAGE_BACKEND '{}'", other),
        }
    }
}

/// Log output style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Unknown LOG_FORMAT '{}'", other),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Storage configuration
    pub database: DatabaseConfig,

    /// Log output style
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Operating mode
    pub environment: Environment,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Which store implementation to use
    pub backend: StorageBackend,

    /// PostgreSQL connection URL (required for the postgres backend)
    pub url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Apply embedded migrations on start-up
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Pool settings for the shared crate
    ///
    /// Returns `None` when no database URL is configured.
    pub fn pool_config(&self) -> Option<pool::DatabaseConfig> {
        self.url.as_ref().map(|url| pool::DatabaseConfig {
            url: url.clone(),
            max_connections: self.max_connections,
            ..Default::default()
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable has an invalid value, or if the
    /// postgres backend is selected without `DATABASE_URL`.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let environment = parse_var("APP_ENV", Environment::Development)?;
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("API_PORT", 3000u16)?;

        let backend = parse_var("STORAGE_BACKEND", StorageBackend::Postgres)?;
        let url = env::var("DATABASE_URL").ok().filter(|u| !u.is_empty());
        if backend == StorageBackend::Postgres && url.is_none() {
            anyhow::bail!("DATABASE_URL environment variable is required for the postgres backend");
        }

        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", 10u32)?;
        let run_migrations = parse_var("RUN_MIGRATIONS", true)?;
        let log_format = parse_var("LOG_FORMAT", LogFormat::Pretty)?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                environment,
            },
            database: DatabaseConfig {
                backend,
                url,
                max_connections,
                run_migrations,
            },
            log_format,
        })
    }

    /// In-memory configuration for tests and local experiments
    pub fn in_memory(environment: Environment) -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Memory,
                url: None,
                max_connections: 1,
                run_migrations: false,
            },
            log_format: LogFormat::Pretty,
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
        let mut config = Config::in_memory(Environment::Test);
        config.api.port = 8080;

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Test);
        assert!("staging".parse::<Environment>().is_err());

        assert!(Environment::Production.is_production());
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Test.is_production());
    }

    #[test]
    fn test_backend_and_log_format_parsing() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("postgresql".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("sqlite".parse::<StorageBackend>().is_err());

        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_pool_config_requires_url() {
        let mut config = Config::in_memory(Environment::Test);
        assert!(config.database.pool_config().is_none());

        config.database.url = Some("postgresql://localhost/test".to_string());
        config.database.max_connections = 4;
        let pool = config.database.pool_config().unwrap();
        assert_eq!(pool.url, "postgresql://localhost/test");
        assert_eq!(pool.max_connections, 4);
    }
}
