//! App - ports を組み合わせたアプリケーション層
//!
//! # 主要コンポーネント
//! - **TableLoader**: TableSource からの読み込み・コンパイル・キャッシュ
//! - **CacheEntryView**: キャッシュの状態ビュー

pub mod loader;
pub mod status;

pub use self::loader::{LoadError, TableLoader};
pub use self::status::CacheEntryView;
