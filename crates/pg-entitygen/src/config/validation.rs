//! Configuration validation.

use super::Config;
use crate::catalog::tls::SslMode;
use crate::error::{GenerateError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.database.host.is_empty() {
        return Err(GenerateError::Config("database.host is required".into()));
    }
    if config.database.database.is_empty() {
        return Err(GenerateError::Config(
            "database.database is required".into(),
        ));
    }
    if config.database.user.is_empty() {
        return Err(GenerateError::Config("database.user is required".into()));
    }
    if config.database.schema.is_empty() {
        return Err(GenerateError::Config("database.schema is required".into()));
    }
    SslMode::parse(&config.database.ssl_mode)?;

    if config.generator.output_dir.as_os_str().is_empty() {
        return Err(GenerateError::Config(
            "generator.output_dir must not be empty".into(),
        ));
    }
    if config.generator.file_suffix.is_empty() {
        return Err(GenerateError::Config(
            "generator.file_suffix must not be empty".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, GeneratorConfig};
    use std::path::PathBuf;

    fn valid_config() -> Config {
        Config {
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                database: "app".to_string(),
                user: "postgres".to_string(),
                password: "password".to_string(),
                schema: "public".to_string(),
                ssl_mode: "disable".to_string(),
            },
            generator: GeneratorConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_host() {
        let mut config = valid_config();
        config.database.host = "".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_user() {
        let mut config = valid_config();
        config.database.user = "".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_ssl_mode() {
        let mut config = valid_config();
        config.database.ssl_mode = "prefer".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid ssl_mode 'prefer'"));
    }

    #[test]
    fn test_ssl_mode_is_case_insensitive() {
        let mut config = valid_config();
        config.database.ssl_mode = "Verify-Full".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_output_dir() {
        let mut config = valid_config();
        config.generator.output_dir = PathBuf::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_file_suffix() {
        let mut config = valid_config();
        config.generator.file_suffix = String::new();
        assert!(validate(&config).is_err());
    }
}
