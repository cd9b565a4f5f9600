//! TableLoader - コンパイル済みテーブルのキー付きキャッシュ
//!
//! The loader owns the cache; the engine itself holds no process-wide state.
//! Each key is fetched and compiled at most once until it is invalidated.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, instrument};

use super::status::CacheEntryView;
use crate::domain::CompileError;
use crate::engine::DecisionTable;
use crate::ports::{SourceError, TableKey, TableSource};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("table '{key}' failed to compile: {source}")]
    Compile {
        key: TableKey,
        #[source]
        source: CompileError,
    },
}

#[derive(Debug, Clone)]
struct CachedTable {
    table: Arc<DecisionTable>,
    loaded_at: DateTime<Utc>,
}

/// Per-key slot. Empty until a load succeeds.
type Slot = Arc<OnceCell<CachedTable>>;

/// Fetches, compiles and caches decision tables by key.
///
/// The map lock is only held to look up or insert a key's slot; fetching and
/// compiling happen outside it, so a slow source never stalls other keys.
///
/// # 使用例
/// ```ignore
/// let loader = TableLoader::new(JsonFileSource::new("tables"));
/// let table = loader.load(&TableKey::new("screening")).await?;
/// let outputs = table.evaluate(&inputs);
/// ```
pub struct TableLoader<S> {
    source: S,
    slots: RwLock<HashMap<TableKey, Slot>>,
}

impl<S: TableSource> TableLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the compiled table for `key`, compiling it on first use.
    ///
    /// Concurrent first loads of the same key compile once; the others wait
    /// on that key's slot and share the result. Failures are not cached.
    #[instrument(name = "loader::load", level = "debug", skip_all, fields(key = %key))]
    pub async fn load(&self, key: &TableKey) -> Result<Arc<DecisionTable>, LoadError> {
        let slot = self.slot(key).await;
        let cached = slot.get_or_try_init(|| self.fetch_and_compile(key)).await?;
        Ok(Arc::clone(&cached.table))
    }

    async fn slot(&self, key: &TableKey) -> Slot {
        if let Some(slot) = self.slots.read().await.get(key) {
            return Arc::clone(slot);
        }
        // 読み取りロックを離している間に別のタスクが挿入したかもしれない
        Arc::clone(self.slots.write().await.entry(key.clone()).or_default())
    }

    async fn fetch_and_compile(&self, key: &TableKey) -> Result<CachedTable, LoadError> {
        let definition = self.source.fetch(key).await?;
        let table = DecisionTable::compile(&definition).map_err(|source| LoadError::Compile {
            key: key.clone(),
            source,
        })?;
        debug!(rules = table.rules().len(), "cached compiled table");
        Ok(CachedTable {
            table: Arc::new(table),
            loaded_at: Utc::now(),
        })
    }

    /// Loads every key up front so a bad table fails at startup rather than
    /// on first use.
    pub async fn preload<'a, I>(&self, keys: I) -> Result<(), LoadError>
    where
        I: IntoIterator<Item = &'a TableKey>,
    {
        for key in keys {
            self.load(key).await?;
        }
        Ok(())
    }

    /// Drops the cached table for `key`. Returns whether a compiled table was
    /// cached.
    ///
    /// Tables already handed out stay valid; the next `load` recompiles.
    pub async fn invalidate(&self, key: &TableKey) -> bool {
        let removed = self
            .slots
            .write()
            .await
            .remove(key)
            .is_some_and(|slot| slot.initialized());
        if removed {
            debug!(key = %key, "invalidated cached table");
        }
        removed
    }

    pub async fn clear(&self) {
        self.slots.write().await.clear();
    }

    /// Snapshot of the compiled tables, sorted by key. Loads still in flight
    /// are not listed.
    pub async fn entries(&self) -> Vec<CacheEntryView> {
        let slots = self.slots.read().await;
        let mut views: Vec<_> = slots
            .iter()
            .filter_map(|(key, slot)| {
                let cached = slot.get()?;
                Some(CacheEntryView {
                    key: key.clone(),
                    name: cached.table.name().map(str::to_string),
                    rules: cached.table.rules().len(),
                    loaded_at: cached.loaded_at,
                })
            })
            .collect();
        views.sort_by(|a, b| a.key.cmp(&b.key));
        views
    }
}
