//! # pg-entitygen
//!
//! Reverse-engineers TypeORM entity classes from a PostgreSQL catalog.
//!
//! One run connects to a single schema, discovers its base tables (or a
//! requested subset), and writes one TypeScript entity file per table with:
//!
//! - **Column mapping** from PostgreSQL types to TypeORM storage kinds
//! - **Primary key strategies** for sequence and UUID generated keys
//! - **Many-to-one relations** derived from foreign keys
//! - **Enum columns** with their labels as TypeScript literal unions
//! - **Deterministic output** so reruns produce byte-identical files
//!
//! ## Example
//!
//! ```rust,no_run
//! use pg_entitygen::{generate, Config};
//!
//! #[tokio::main]
//! async fn main() -> pg_entitygen::Result<()> {
//!     let config = Config::load("entitygen.yaml")?;
//!     let report = generate(&config, &["users".to_string()]).await?;
//!     println!("Generated {} entity files", report.files.len());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod defaults;
pub mod emit;
pub mod error;
pub mod generator;
pub mod naming;
pub mod relations;
pub mod typemap;

// Re-exports for convenient access
pub use catalog::PgCatalog;
pub use config::{Config, DatabaseConfig, GeneratorConfig};
pub use core::schema::{ColumnDescriptor, ForeignKeyDescriptor, TableDescriptor, TableSet};
pub use core::traits::CatalogReader;
pub use emit::{emit_entity, GeneratedEntityFile};
pub use error::{GenerateError, Result};
pub use generator::{generate, GeneratedFile, GenerationReport, Generator};
