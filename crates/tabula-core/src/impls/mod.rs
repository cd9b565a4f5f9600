//! Impls - TableSource の実装
//!
//! # 含まれる実装
//! - **JsonFileSource**: ディレクトリ内の JSON ドキュメント
//! - **InMemorySource**: テスト・組み込み用

pub mod in_memory;
pub mod json_file;

pub use self::in_memory::InMemorySource;
pub use self::json_file::JsonFileSource;
