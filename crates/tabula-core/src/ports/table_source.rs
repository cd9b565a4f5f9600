//! TableSource port - where raw table definitions come from
//!
//! The engine never reads files; a source hands it an already-parsed
//! [`TableDefinition`]. Sources are keyed by [`TableKey`] so a loader can
//! cache compiled tables per key.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TableDefinition;

/// Identity of a table within a source (a file stem, a registry name, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableKey(String);

impl TableKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TableKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("table '{0}' not found")]
    NotFound(TableKey),

    #[error("table '{key}' could not be read: {source}")]
    Io {
        key: TableKey,
        #[source]
        source: std::io::Error,
    },

    #[error("table '{key}' is not a valid table document: {source}")]
    Json {
        key: TableKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Supplies raw table definitions by key.
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch(&self, key: &TableKey) -> Result<TableDefinition, SourceError>;
}
