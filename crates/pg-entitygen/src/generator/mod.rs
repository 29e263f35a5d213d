//! Generation orchestrator - drives a run from table discovery to files.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::PgCatalog;
use crate::config::{Config, GeneratorConfig};
use crate::core::traits::CatalogReader;
use crate::emit::emit_entity;
use crate::error::{GenerateError, Result};
use crate::naming::entity_file_name;

/// Entity generator over a catalog reader.
pub struct Generator<'a> {
    catalog: &'a dyn CatalogReader,
    config: GeneratorConfig,
}

/// One entity file produced by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Source table.
    pub table: String,

    /// Path of the entity file.
    pub path: PathBuf,

    /// Size of the rendered file in bytes.
    pub bytes: usize,
}

/// Result of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Unique run identifier.
    pub run_id: String,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Whether files were only rendered, not written.
    pub dry_run: bool,

    /// Files generated, ordered by table name.
    pub files: Vec<GeneratedFile>,

    /// Requested tables that do not exist.
    pub missing_tables: Vec<String>,

    /// Tables skipped because an earlier table maps to the same file.
    pub colliding_tables: Vec<String>,
}

impl GenerationReport {
    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> Generator<'a> {
    /// Create a generator over an open catalog.
    pub fn new(catalog: &'a dyn CatalogReader, config: GeneratorConfig) -> Self {
        Self { catalog, config }
    }

    /// Generate entities for the requested tables, or for every table when
    /// `requested` is empty.
    ///
    /// Tables are processed concurrently. The first failure aborts the run;
    /// files already written by then are left in place.
    pub async fn run(&self, requested: &[String]) -> Result<GenerationReport> {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        info!("Starting run {} against {} catalog", run_id, self.catalog.db_type());
        if requested.is_empty() {
            info!("Generating entities for all tables");
        } else {
            info!(
                "Generating entities for specific tables: {}",
                requested.join(", ")
            );
        }

        let tables = self
            .catalog
            .list_tables(requested, &self.config.excluded_tables)
            .await?;

        if !tables.missing.is_empty() {
            warn!(
                "The following tables were not found: {}",
                tables.missing.join(", ")
            );
        }
        info!("Found {} tables to process.", tables.found.len());

        let (claimed, colliding_tables) =
            claim_file_names(&tables.found, &self.config.file_suffix);

        if !self.config.dry_run {
            tokio::fs::create_dir_all(&self.config.output_dir)
                .await
                .map_err(|e| GenerateError::write(&self.config.output_dir, e))?;
        }

        let files = try_join_all(claimed.into_iter().map(|t| self.generate_table(t))).await?;

        let completed_at = Utc::now();
        let duration_seconds = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

        info!(
            "Entity generation completed: {} files{} in {:.1}s",
            files.len(),
            if self.config.dry_run { " (dry run)" } else { "" },
            duration_seconds
        );

        Ok(GenerationReport {
            run_id,
            started_at,
            completed_at,
            duration_seconds,
            dry_run: self.config.dry_run,
            files,
            missing_tables: tables.missing,
            colliding_tables,
        })
    }

    async fn generate_table(&self, table: &str) -> Result<GeneratedFile> {
        info!("Processing table: {}", table);

        let descriptor = self.catalog.describe_table(table).await?;
        let entity = emit_entity(&descriptor, &self.config);
        let path = self.config.output_dir.join(&entity.file_name);

        if self.config.dry_run {
            info!("Would create entity file: {}", path.display());
        } else {
            write_atomic(&path, &entity.contents).await?;
            info!("Created entity file: {}", path.display());
        }

        Ok(GeneratedFile {
            table: entity.table,
            path,
            bytes: entity.contents.len(),
        })
    }
}

/// Keep the first table for each entity file name.
///
/// Returns the tables to generate and the ones whose file name is already
/// taken by an earlier table.
fn claim_file_names<'t>(
    tables: &'t [String],
    file_suffix: &str,
) -> (Vec<&'t str>, Vec<String>) {
    let mut owners: BTreeMap<String, &str> = BTreeMap::new();
    let mut claimed = Vec::with_capacity(tables.len());
    let mut colliding = Vec::new();

    for table in tables {
        match owners.entry(entity_file_name(table, file_suffix)) {
            Entry::Vacant(slot) => {
                slot.insert(table);
                claimed.push(table.as_str());
            }
            Entry::Occupied(slot) => {
                warn!(
                    "Skipping table {}: {} is already generated from table {}",
                    table,
                    slot.key(),
                    slot.get()
                );
                colliding.push(table.clone());
            }
        }
    }

    (claimed, colliding)
}

/// Connect, generate and close the connection on every exit path.
pub async fn generate(config: &Config, requested: &[String]) -> Result<GenerationReport> {
    let catalog = PgCatalog::connect(&config.database).await?;
    let result = Generator::new(&catalog, config.generator.clone())
        .run(requested)
        .await;
    catalog.close().await;
    result
}

/// Write to a temp file next to `path`, then rename it into place.
async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    tokio::fs::write(&temp_path, contents)
        .await
        .map_err(|e| GenerateError::write(path, e))?;

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
            warn!("Could not remove {}: {}", temp_path.display(), cleanup);
        }
        return Err(GenerateError::write(path, e));
    }

    Ok(())
}
