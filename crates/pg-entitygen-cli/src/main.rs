//! pg-entitygen CLI - TypeORM entities from a PostgreSQL catalog.

use clap::{Parser, Subcommand};
use pg_entitygen::{generate, Config, GenerateError, PgCatalog};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "pg-entitygen")]
#[command(about = "Generate TypeORM entities from a PostgreSQL catalog")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file (default: POSTGRES_* environment variables)
    #[arg(short, long, env = "PG_ENTITYGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate entity files for all tables or the named ones
    Generate {
        /// Tables to generate (default: all tables in the schema)
        #[arg(value_name = "TABLE")]
        tables: Vec<String>,

        /// Table to generate; may be repeated
        #[arg(short = 't', long = "table", value_name = "NAME")]
        table_flags: Vec<String>,

        /// Override output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Override schema to introspect
        #[arg(long)]
        schema: Option<String>,

        /// Render entities without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Test the database connection
    HealthCheck,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), GenerateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::from_env()?,
    };

    match cli.command {
        Commands::Generate {
            tables,
            table_flags,
            output_dir,
            schema,
            dry_run,
        } => {
            if let Some(dir) = output_dir {
                config.generator.output_dir = dir;
            }
            if let Some(schema) = schema {
                config.database.schema = schema;
            }
            config.generator.dry_run |= dry_run;
            config.validate()?;

            let mut requested = tables;
            requested.extend(table_flags);

            let report = generate(&config, &requested).await?;

            if cli.output_json {
                println!("{}", report.to_json()?);
            } else {
                let status_msg = if report.dry_run {
                    "Dry run completed!"
                } else {
                    "Entity generation completed!"
                };
                println!("\n{}", status_msg);
                println!("  Run ID: {}", report.run_id);
                println!("  Duration: {:.2}s", report.duration_seconds);
                println!("  Files: {}", report.files.len());
                for file in &report.files {
                    println!("    {} -> {}", file.table, file.path.display());
                }
                if !report.missing_tables.is_empty() {
                    println!("  Missing tables: {:?}", report.missing_tables);
                }
                if !report.colliding_tables.is_empty() {
                    println!("  Skipped (file name taken): {:?}", report.colliding_tables);
                }
            }
        }

        Commands::HealthCheck => {
            let catalog = PgCatalog::connect(&config.database).await?;
            let latency = catalog.ping().await;
            catalog.close().await;
            let latency_ms = latency?.as_millis() as u64;

            if cli.output_json {
                let result = serde_json::json!({
                    "healthy": true,
                    "host": config.database.host,
                    "database": config.database.database,
                    "schema": config.database.schema,
                    "latency_ms": latency_ms,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Health Check Results:");
                println!(
                    "  PostgreSQL {}:{}/{}: OK ({}ms)",
                    config.database.host, config.database.port, config.database.database, latency_ms
                );
            }
        }
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the report; logs go to stderr.
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
