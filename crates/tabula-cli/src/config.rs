use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "TABULA_CONFIG";

/// CLI configuration. Every field has a default, so an empty `{}` file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `<key>.json` table documents.
    #[serde(default = "default_table_dir")]
    pub table_dir: PathBuf,

    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Pretty-print results instead of one JSON object per line.
    #[serde(default)]
    pub pretty: bool,
}

fn default_table_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_dir: default_table_dir(),
            log_filter: default_log_filter(),
            pretty: false,
        }
    }
}

impl Config {
    /// Reads the file named by `TABULA_CONFIG`, or falls back to defaults.
    pub fn load() -> Result<Self, CliError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config: Config =
            serde_json::from_str(r#"{ "table_dir": "tables", "pretty": true }"#).unwrap();
        assert_eq!(config.table_dir, PathBuf::from("tables"));
        assert!(config.pretty);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
