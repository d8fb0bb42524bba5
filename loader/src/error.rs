//! Error types for spec loading.
//!
//! Covers every failure between a file on disk and a built
//! [`Application`](command_tree_core::Application): I/O, deserialization,
//! unknown file formats, and command-tree integrity violations.

use command_tree_core::BuildError;
use thiserror::Error;

/// Errors that can occur while loading or building a spec.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is not one of `json`, `yaml`, `yml`.
    #[error("unsupported spec format: {0}")]
    UnsupportedFormat(String),

    /// The described tree is malformed; `path` names the offending command.
    #[error("invalid command '{path}': {source}")]
    Build {
        path: String,
        #[source]
        source: BuildError,
    },
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
