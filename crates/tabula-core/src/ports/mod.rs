//! Ports - seams to the collaborators around the engine.

pub mod table_source;

pub use table_source::{SourceError, TableKey, TableSource};
