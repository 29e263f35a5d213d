//! PostgreSQL catalog introspection.
//!
//! [`PgCatalog`] owns the single catalog connection of a run. It is created
//! once by the caller, shared by reference with every table task, and closed
//! once at the end. Per table it issues four read-only queries (columns,
//! primary key, foreign keys, enum labels) concurrently on that connection.

pub mod tls;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Connection, NoTls};
use tracing::{debug, error, info};

use crate::config::DatabaseConfig;
use crate::core::schema::{
    ColumnDescriptor, EnumLabels, ForeignKeyDescriptor, TableDescriptor, TableSet,
};
use crate::core::traits::CatalogReader;
use crate::error::{GenerateError, Result};

use self::tls::SslMode;

const LIST_REQUESTED_TABLES: &str = r#"
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema = $1::text
      AND table_type = 'BASE TABLE'
      AND table_name::text = ANY($2::text[])
    ORDER BY table_name
"#;

const LIST_ALL_TABLES: &str = r#"
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema = $1::text
      AND table_type = 'BASE TABLE'
      AND NOT (table_name::text = ANY($2::text[]))
    ORDER BY table_name
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT
        column_name::text,
        data_type::text,
        character_maximum_length::int4,
        is_nullable = 'YES',
        column_default::text,
        udt_name::text
    FROM information_schema.columns
    WHERE table_schema = $1::text AND table_name = $2::text
    ORDER BY ordinal_position
"#;

const PRIMARY_KEY_QUERY: &str = r#"
    SELECT a.attname::text
    FROM pg_catalog.pg_constraint c
    JOIN pg_catalog.pg_class t ON t.oid = c.conrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid
    WHERE n.nspname = $1::text
      AND t.relname = $2::text
      AND c.contype = 'p'
      AND a.attnum = ANY(c.conkey)
    ORDER BY array_position(c.conkey, a.attnum)
"#;

const FOREIGN_KEY_QUERY: &str = r#"
    SELECT
        a.attname::text AS column_name,
        rt.relname::text AS ref_table,
        ra.attname::text AS ref_column
    FROM pg_catalog.pg_constraint c
    JOIN pg_catalog.pg_class t ON t.oid = c.conrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_catalog.pg_class rt ON rt.oid = c.confrelid
    CROSS JOIN LATERAL unnest(c.conkey, c.confkey) WITH ORDINALITY AS k(attnum, ref_attnum, position)
    JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum
    JOIN pg_catalog.pg_attribute ra ON ra.attrelid = rt.oid AND ra.attnum = k.ref_attnum
    WHERE n.nspname = $1::text
      AND t.relname = $2::text
      AND c.contype = 'f'
    ORDER BY c.conname, k.position
"#;

const ENUM_LABELS_QUERY: &str = r#"
    SELECT a.attname::text, e.enumlabel::text
    FROM pg_catalog.pg_attribute a
    JOIN pg_catalog.pg_class t ON t.oid = a.attrelid
    JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_catalog.pg_enum e ON e.enumtypid = a.atttypid
    WHERE n.nspname = $1::text
      AND t.relname = $2::text
      AND a.attnum > 0
      AND NOT a.attisdropped
    ORDER BY a.attnum, e.enumsortorder
"#;

/// Catalog reader over one PostgreSQL connection.
pub struct PgCatalog {
    client: Client,
    connection: JoinHandle<()>,
    schema: String,
}

impl PgCatalog {
    /// Open the catalog connection and check it with `SELECT 1`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pg_config = config.pg_config();
        let ssl_mode = SslMode::parse(&config.ssl_mode)?;

        let (client, connection) = match tls::connector(ssl_mode)? {
            Some(tls) => {
                let (client, connection) = pg_config.connect(tls).await?;
                (client, drive(connection))
            }
            None => {
                let (client, connection) = pg_config.connect(NoTls).await?;
                (client, drive(connection))
            }
        };

        client.simple_query("SELECT 1").await?;

        info!(
            "Connected to PostgreSQL: {}:{}/{} (schema '{}')",
            config.host, config.port, config.database, config.schema
        );

        Ok(Self {
            client,
            connection,
            schema: config.schema.clone(),
        })
    }

    /// Round-trip a trivial query and report its latency.
    pub async fn ping(&self) -> Result<Duration> {
        let start = Instant::now();
        self.client.simple_query("SELECT 1").await?;
        Ok(start.elapsed())
    }

    /// Close the connection and wait for the connection task to finish.
    pub async fn close(self) {
        drop(self.client);
        if let Err(e) = self.connection.await {
            error!("Catalog connection task failed: {}", e);
        }
        info!("Database connection closed.");
    }

    async fn load_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows = self
            .client
            .query(COLUMNS_QUERY, &[&self.schema, &table])
            .await
            .map_err(|e| GenerateError::catalog(table, "columns", e))?;

        Ok(rows
            .iter()
            .map(|row| ColumnDescriptor {
                name: row.get(0),
                data_type: row.get(1),
                max_length: row.get(2),
                is_nullable: row.get(3),
                default: row.get(4),
                udt_name: row.get(5),
            })
            .collect())
    }

    async fn load_primary_key(&self, table: &str) -> Result<Vec<String>> {
        let rows = self
            .client
            .query(PRIMARY_KEY_QUERY, &[&self.schema, &table])
            .await
            .map_err(|e| GenerateError::catalog(table, "primary key", e))?;

        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    async fn load_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyDescriptor>> {
        let rows = self
            .client
            .query(FOREIGN_KEY_QUERY, &[&self.schema, &table])
            .await
            .map_err(|e| GenerateError::catalog(table, "foreign keys", e))?;

        Ok(rows
            .iter()
            .map(|row| ForeignKeyDescriptor {
                column: row.get(0),
                ref_table: row.get(1),
                ref_column: row.get(2),
            })
            .collect())
    }

    async fn load_enum_labels(&self, table: &str) -> Result<EnumLabels> {
        let rows = self
            .client
            .query(ENUM_LABELS_QUERY, &[&self.schema, &table])
            .await
            .map_err(|e| GenerateError::catalog(table, "enum labels", e))?;

        Ok(rows
            .iter()
            .map(|row| (row.get::<_, String>(0), row.get::<_, String>(1)))
            .collect())
    }

    async fn query_table_names(&self, query: &str, names: &[String]) -> Result<Vec<String>> {
        let rows = self.client.query(query, &[&self.schema, &names]).await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn list_tables(&self, requested: &[String], excluded: &[String]) -> Result<TableSet> {
        if requested.is_empty() {
            let found = self.query_table_names(LIST_ALL_TABLES, excluded).await?;
            return Ok(TableSet {
                found,
                missing: Vec::new(),
            });
        }

        let existing = self
            .query_table_names(LIST_REQUESTED_TABLES, requested)
            .await?;
        Ok(TableSet::partition(requested, existing))
    }

    async fn describe_table(&self, table: &str) -> Result<TableDescriptor> {
        let (columns, primary_key, foreign_keys, enum_labels) = tokio::try_join!(
            self.load_columns(table),
            self.load_primary_key(table),
            self.load_foreign_keys(table),
            self.load_enum_labels(table),
        )?;

        debug!(
            "Described {}.{}: {} columns, {} primary key columns, {} foreign keys, {} enum columns",
            self.schema,
            table,
            columns.len(),
            primary_key.len(),
            foreign_keys.len(),
            enum_labels.len()
        );

        Ok(TableDescriptor {
            name: table.to_string(),
            columns,
            primary_key,
            foreign_keys,
            enum_labels,
        })
    }

    fn db_type(&self) -> &str {
        "postgres"
    }
}

/// Spawn the task that drives the connection's socket.
fn drive<S, T>(connection: Connection<S, T>) -> JoinHandle<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("PostgreSQL connection error: {}", e);
        }
    })
}
