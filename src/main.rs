use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use record_store_catalog::catalog_store::{
    CatalogStore, SqliteCatalogStore, DEFAULT_READ_POOL_SIZE,
};
use record_store_catalog::config::{AppConfig, CliConfig, FileConfig};
use record_store_catalog::server::{run_server, RequestsLoggingLevel};

/// Resolves a relative database path against the current directory.
/// SQLite `file:` URIs are passed through untouched.
fn parse_db_location(s: &str) -> Result<String> {
    if s.starts_with("file:") {
        return Ok(s.to_string());
    }
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(s.to_string());
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf).to_string_lossy().into_owned())
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite catalog database file, or a SQLite `file:` URI.
    #[clap(value_parser = parse_db_location)]
    pub db: Option<String>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The address to bind to.
    #[clap(long, default_value = "127.0.0.1")]
    pub bind_address: String,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Number of read-only database connections.
    #[clap(long, default_value_t = DEFAULT_READ_POOL_SIZE)]
    pub read_pool_size: usize,

    /// Optional TOML config file, its values override the command line.
    #[clap(long)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db.clone(),
            port: self.port,
            bind_address: self.bind_address.clone(),
            logging_level: self.logging_level,
            read_pool_size: self.read_pool_size,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening SQLite catalog database at {}...", config.db_path);
    let catalog_store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::new(
        &config.db_path,
        config.read_pool_size,
    )?);

    run_server(config.server_config(), catalog_store).await
}
