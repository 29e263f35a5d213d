//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::{GenerateError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use tokio_postgres::Config as PgConfig;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from `POSTGRES_*` environment variables.
    ///
    /// A `.env` file in the working directory is read first when present;
    /// variables already set in the process environment win.
    pub fn from_env() -> Result<Self> {
        load_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| GenerateError::Config(format!("{} is not set", key)))
        };

        let port = match lookup("POSTGRES_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                GenerateError::Config(format!("POSTGRES_PORT '{}' is not a valid port", raw))
            })?,
            None => default_pg_port(),
        };

        let config = Config {
            database: DatabaseConfig {
                host: required("POSTGRES_HOST")?,
                port,
                database: required("POSTGRES_DATABASE")?,
                user: required("POSTGRES_USER")?,
                password: lookup("POSTGRES_PASSWORD").unwrap_or_default(),
                schema: lookup("POSTGRES_SCHEMA").unwrap_or_else(default_public_schema),
                ssl_mode: lookup("POSTGRES_SSL_MODE").unwrap_or_else(default_require),
            },
            generator: GeneratorConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

/// A missing `.env` file is fine; a malformed one is a configuration error.
fn load_dotenv(result: dotenvy::Result<PathBuf>) -> Result<()> {
    match result {
        Ok(path) => {
            debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(GenerateError::Config(format!("Invalid .env file: {}", e))),
    }
}

impl DatabaseConfig {
    /// Build a tokio-postgres connection config.
    pub fn pg_config(&self) -> PgConfig {
        let mut pg_config = PgConfig::new();
        pg_config.host(&self.host);
        pg_config.port(self.port);
        pg_config.dbname(&self.database);
        pg_config.user(&self.user);
        pg_config.password(&self.password);
        pg_config.application_name("pg-entitygen");
        pg_config
    }
}
