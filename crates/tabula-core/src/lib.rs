//! tabula-core
//!
//! Decision table compiler and first-match evaluator.
//!
//! # モジュール構成
//! - **domain**: 値・テーブル定義・エラー（Value, TableDefinition, CompileError）
//! - **expr**: セル式のコンパイラ（Predicate）
//! - **engine**: コンパイル済みテーブルと評価（DecisionTable）
//! - **ports**: 外部との境界（TableSource, TableKey）
//! - **impls**: ports の実装（JsonFileSource, InMemorySource）
//! - **app**: キャッシュ付きローダー（TableLoader）
//!
//! # Example
//! ```
//! use tabula_core::domain::{Inputs, TableDefinition, Value};
//! use tabula_core::engine::DecisionTable;
//!
//! let definition = TableDefinition::from_json_str(r#"{
//!     "inputs": [{ "name": "Age", "type": "integer" }],
//!     "output": { "name": "Adult", "type": "boolean" },
//!     "rules": [
//!         { "inputs": [">=18"], "output": "true" },
//!         { "inputs": ["<18"], "output": "false" }
//!     ]
//! }"#).unwrap();
//! let table = DecisionTable::compile(&definition).unwrap();
//!
//! let inputs = Inputs::from([("Age".to_string(), Value::Integer(30))]);
//! assert_eq!(table.evaluate(&inputs)["Adult"], Value::Boolean(true));
//! ```

pub mod app;
pub mod domain;
pub mod engine;
pub mod expr;
pub mod impls;
pub mod ports;

pub use domain::{CompileError, Inputs, TableDefinition, Value};
pub use engine::{DecisionTable, Outputs};
