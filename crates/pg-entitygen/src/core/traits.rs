//! Core traits for catalog introspection.
//!
//! - [`CatalogReader`]: discovers tables and describes them from a database catalog
//!
//! The orchestrator only talks to the catalog through this trait, so the
//! whole pipeline can run against an in-memory catalog in tests.

use async_trait::async_trait;

use crate::error::Result;

use super::schema::{TableDescriptor, TableSet};

/// Read table metadata from a database catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Resolve the tables to generate.
    ///
    /// With an empty `requested` list every base table of the working schema
    /// is returned except those in `excluded`. Otherwise only the requested
    /// tables that exist are returned and the rest are reported as missing;
    /// the exclusion list does not apply to explicit requests.
    async fn list_tables(&self, requested: &[String], excluded: &[String]) -> Result<TableSet>;

    /// Describe one table: columns, primary key, foreign keys and enum labels.
    async fn describe_table(&self, table: &str) -> Result<TableDescriptor>;

    /// Get the catalog type identifier (e.g., "postgres").
    fn db_type(&self) -> &str;
}
