//! Error types for suite generation.

use std::path::PathBuf;

/// Errors raised while discovering benchmarks or emitting harness sources.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The module handed to the generator cannot be walked.
    #[error("invalid module: {0}")]
    InvalidModule(String),

    #[error("failed to read module description {}: {source}", .path.display())]
    ModuleLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed module description: {0}")]
    ModuleDecode(#[from] serde_json::Error),

    /// Writing a generated source unit failed. Files written earlier in the
    /// run are left in place.
    #[error("failed to write generated source {}: {source}", .path.display())]
    Emit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only raised in strict mode.
    #[error("benchmark contract violated: {0}")]
    ContractViolation(String),
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
