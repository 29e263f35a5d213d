//! Error types for the entity generator.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for connection errors.
pub const EXIT_CONNECTION_ERROR: u8 = 2;
/// Exit code for catalog query errors.
pub const EXIT_CATALOG_ERROR: u8 = 3;
/// Exit code for entity file write errors.
pub const EXIT_WRITE_ERROR: u8 = 4;
/// Exit code for any other IO or serialization error.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for generation runs.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cannot establish or keep the catalog connection
    #[error("Database connection error: {0}")]
    Connection(#[from] tokio_postgres::Error),

    /// One of the per-table catalog queries failed
    #[error("Catalog query '{query}' failed for table {table}: {source}")]
    CatalogQuery {
        table: String,
        query: &'static str,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Writing a generated entity file failed
    #[error("Failed to write entity file {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error (config file, output directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerateError {
    /// Create a CatalogQuery error for a table.
    pub fn catalog(
        table: impl Into<String>,
        query: &'static str,
        source: tokio_postgres::Error,
    ) -> Self {
        GenerateError::CatalogQuery {
            table: table.into(),
            query,
            source,
        }
    }

    /// Create a FileWrite error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            GenerateError::Config(_) | GenerateError::Yaml(_) => EXIT_CONFIG_ERROR,
            GenerateError::Connection(_) => EXIT_CONNECTION_ERROR,
            GenerateError::CatalogQuery { .. } => EXIT_CATALOG_ERROR,
            GenerateError::FileWrite { .. } => EXIT_WRITE_ERROR,
            GenerateError::Io(_) | GenerateError::Json(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GenerateError>;
