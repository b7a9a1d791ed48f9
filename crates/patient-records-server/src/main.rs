use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use patient_records_server::{open_store, serve, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "patient-records", version, about = "Patient record management service")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config; in-memory when unset)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// JSON seed document imported at startup (overrides config)
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Import a JSON document keyed by patient id
    Import { file: PathBuf },
    /// Export every record
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file; stdout when unset
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormat {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database_path = Some(database);
    }
    if let Some(seed) = cli.seed {
        config.seed_path = Some(seed);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    });

    match command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let store = Arc::new(open_store(&config)?);
            serve(&config, store).await?;
        }
        Command::Import { file } => {
            if config.database_path.is_none() {
                warn!("no database configured; imported records will not persist");
            }
            let store = open_store(&config)?;
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let summary = store
                .import_json(&json)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            info!(
                imported = summary.imported,
                skipped = summary.skipped,
                "import complete"
            );
        }
        Command::Export { format, output } => {
            let store = open_store(&config)?;
            let export = store.export()?;
            let rendered = match format {
                ExportFormat::Json => export.to_json()?,
                ExportFormat::Csv => export.to_csv(),
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(count = export.count(), path = %path.display(), "export complete");
                }
                None => println!("{}", rendered),
            }
        }
    }

    Ok(())
}
