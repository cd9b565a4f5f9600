use std::path::PathBuf;

use tabula_core::app::LoadError;
use tabula_core::domain::InputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("case {case}: expected a JSON object of input values")]
    CaseShape { case: usize },

    #[error("case {case}: {source}")]
    Input {
        case: usize,
        #[source]
        source: InputError,
    },

    #[error("evaluation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
