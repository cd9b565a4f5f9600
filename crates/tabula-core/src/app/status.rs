//! Status - ローダーキャッシュのビュー

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::TableKey;

/// One cached table, as reported by [`TableLoader::entries`](super::TableLoader::entries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntryView {
    pub key: TableKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub rules: usize,
    pub loaded_at: DateTime<Utc>,
}
