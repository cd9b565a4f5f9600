//! Errors - compile-time and input-boundary failures
//!
//! Evaluation itself has no error type: once a table compiles, every
//! evaluation produces a result (possibly `null`).

use thiserror::Error;

/// A single cell expression could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("unsupported expression syntax `{0}`")]
    Unrecognized(String),

    #[error("range `{text}` has lower bound {min} above upper bound {max}")]
    InvertedRange { text: String, min: i64, max: i64 },

    #[error("`{0}` is only valid as an input entry")]
    InputOnly(String),
}

/// A decision table could not be compiled.
///
/// Rule numbers are 1-based, the way table authors count rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("decision table has no rules")]
    NoRules,

    #[error("duplicate input column '{0}'")]
    DuplicateInput(String),

    #[error("rule {rule}: expected {expected} input entries, found {found}")]
    ArityMismatch {
        rule: usize,
        expected: usize,
        found: usize,
    },

    #[error("rule {rule}, input '{column}': {source}")]
    InputEntry {
        rule: usize,
        column: String,
        #[source]
        source: ExpressionError,
    },

    #[error("rule {rule}, output '{column}': {source}")]
    OutputEntry {
        rule: usize,
        column: String,
        #[source]
        source: ExpressionError,
    },
}

/// Runtime input could not be narrowed into a [`Value`](super::Value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("value is not a scalar")]
    NotScalar,

    #[error("input '{name}' must be a string, boolean, number or null")]
    Unsupported { name: String },
}
