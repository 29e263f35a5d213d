//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog database configuration (PostgreSQL).
    pub database: DatabaseConfig,

    /// Entity generation behavior.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// PostgreSQL connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,

    /// Database port (default: 5432).
    #[serde(default = "default_pg_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// Schema to introspect (default: "public").
    #[serde(default = "default_public_schema")]
    pub schema: String,

    /// SSL mode (default: "require").
    #[serde(default = "default_require")]
    pub ssl_mode: String,
}

/// Entity generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Directory the entity files are written to (default: "reverse-engineered").
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Suffix appended to the type name to build the file name (default: ".entity.ts").
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,

    /// Trailing token stripped from foreign key columns to name relations (default: "_id").
    #[serde(default = "default_reference_suffix")]
    pub reference_suffix: String,

    /// Tables skipped when no explicit table list is requested.
    #[serde(default = "default_excluded_tables")]
    pub excluded_tables: Vec<String>,

    /// Render entities without writing any file.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_suffix: default_file_suffix(),
            reference_suffix: default_reference_suffix(),
            excluded_tables: default_excluded_tables(),
            dry_run: false,
        }
    }
}

pub(crate) fn default_pg_port() -> u16 {
    5432
}

pub(crate) fn default_public_schema() -> String {
    "public".to_string()
}

pub(crate) fn default_require() -> String {
    "require".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reverse-engineered")
}

fn default_file_suffix() -> String {
    ".entity.ts".to_string()
}

fn default_reference_suffix() -> String {
    "_id".to_string()
}

fn default_excluded_tables() -> Vec<String> {
    vec!["migrations".to_string(), "typeorm_metadata".to_string()]
}
