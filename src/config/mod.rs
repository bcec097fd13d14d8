mod file_config;

pub use file_config::FileConfig;

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::Path;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<String>,
    pub port: u16,
    pub bind_address: String,
    pub logging_level: RequestsLoggingLevel,
    pub read_pool_size: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database file path or SQLite `file:` URI.
    pub db_path: String,
    pub port: u16,
    pub bind_address: String,
    pub logging_level: RequestsLoggingLevel,
    pub read_pool_size: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be given as an argument or in the config file")
            })?;

        if !db_path.starts_with("file:") {
            if let Some(parent) = Path::new(&db_path).parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    bail!("Database directory does not exist: {:?}", parent);
                }
            }
        }

        let port = file.port.unwrap_or(cli.port);
        let bind_address = file
            .bind_address
            .unwrap_or_else(|| cli.bind_address.clone());

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or(cli.logging_level);

        let read_pool_size = file.read_pool_size.unwrap_or(cli.read_pool_size);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        Ok(AppConfig {
            db_path,
            port,
            bind_address,
            logging_level,
            read_pool_size,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level,
            port: self.port,
            bind_address: self.bind_address.clone(),
        }
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
