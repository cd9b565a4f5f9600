//! InMemorySource - テスト・組み込み用の TableSource
//!
//! Built up front, then only read. No locking needed.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::TableDefinition;
use crate::ports::{SourceError, TableKey, TableSource};

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: HashMap<TableKey, TableDefinition>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition; "last wins" for a repeated key.
    pub fn insert(&mut self, key: impl Into<TableKey>, definition: TableDefinition) {
        self.tables.insert(key.into(), definition);
    }

    pub fn with_table(mut self, key: impl Into<TableKey>, definition: TableDefinition) -> Self {
        self.insert(key, definition);
        self
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[async_trait]
impl TableSource for InMemorySource {
    async fn fetch(&self, key: &TableKey) -> Result<TableDefinition, SourceError> {
        self.tables
            .get(key)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(key.clone()))
    }
}
