use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings read from the optional TOML config file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_path: Option<String>,
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub logging_level: Option<String>,
    pub read_pool_size: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "port = 8080\nlogging_level = \"headers\"\n").unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.logging_level.as_deref(), Some("headers"));
        assert!(config.db_path.is_none());
        assert!(config.read_pool_size.is_none());
    }

    #[test]
    fn rejects_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();
        assert!(FileConfig::load(&path).is_err());
        assert!(FileConfig::load(&temp_dir.path().join("missing.toml")).is_err());
    }
}
