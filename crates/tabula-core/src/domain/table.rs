//! Raw decision table definitions, as handed over by a loader.
//!
//! Cells are kept as the author wrote them; nothing here is compiled. See
//! [`crate::engine::DecisionTable::compile`] for the compiled form.

use serde::{Deserialize, Serialize};

/// Declared type of a column.
///
/// Informational only: cell expressions decide how a value is matched, and
/// values are never re-validated against this at evaluation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Boolean,
    Number,
    Integer,
    #[default]
    #[serde(other)]
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputColumn {
    pub name: String,

    #[serde(default, rename = "type")]
    pub declared_type: ColumnType,
}

impl InputColumn {
    pub fn new(name: impl Into<String>, declared_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            declared_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputColumn {
    pub name: String,

    #[serde(default, rename = "type")]
    pub declared_type: ColumnType,
}

impl OutputColumn {
    pub fn new(name: impl Into<String>, declared_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            declared_type,
        }
    }
}

/// One row of the table: an entry per input column (same order) plus the
/// output entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub inputs: Vec<String>,

    #[serde(default)]
    pub output: String,

    /// Free-form annotation carried through for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RuleDefinition {
    pub fn new<I, S>(inputs: I, output: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: output.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An uncompiled decision table with a single output column.
///
/// Rule order is significant: the first rule whose entries all match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub inputs: Vec<InputColumn>,
    pub output: OutputColumn,

    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl TableDefinition {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
