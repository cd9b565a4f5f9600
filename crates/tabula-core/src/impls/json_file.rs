//! JsonFileSource - ディレクトリ内の `<key>.json` を読む TableSource

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::TableDefinition;
use crate::ports::{SourceError, TableKey, TableSource};

/// Reads table documents from `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    root: PathBuf,
}

impl JsonFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `None` for keys that would escape `root`.
    fn path_for(&self, key: &TableKey) -> Option<PathBuf> {
        let k = key.as_str();
        if k.is_empty() || k.starts_with('.') || k.contains(['/', '\\']) {
            return None;
        }
        Some(self.root.join(format!("{k}.json")))
    }
}

#[async_trait]
impl TableSource for JsonFileSource {
    async fn fetch(&self, key: &TableKey) -> Result<TableDefinition, SourceError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| SourceError::NotFound(key.clone()))?;
        debug!(path = %path.display(), "reading table document");

        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                SourceError::NotFound(key.clone())
            } else {
                SourceError::Io {
                    key: key.clone(),
                    source: e,
                }
            }
        })?;

        TableDefinition::from_json_str(&text).map_err(|source| SourceError::Json {
            key: key.clone(),
            source,
        })
    }
}
