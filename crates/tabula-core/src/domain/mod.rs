//! Domain model (values, raw table definitions, errors).

pub mod errors;
pub mod table;
pub mod value;

pub use errors::{CompileError, ExpressionError, InputError};
pub use table::{ColumnType, InputColumn, OutputColumn, RuleDefinition, TableDefinition};
pub use value::{Inputs, Value};
