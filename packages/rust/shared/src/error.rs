//! Error types for pagegen.
//!
//! Library crates use [`PageGenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pagegen operations.
#[derive(Debug, thiserror::Error)]
pub enum PageGenError {
    /// A stage's required input is missing or malformed.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Unexpected condition inside a stage's core transformation.
    #[error("transformation error: {message}")]
    Transformation { message: String },

    /// The block registry has no implementation for the requested name.
    #[error("Unknown block: {name}")]
    UnknownBlock { name: String },

    /// Page assembly could not produce the requested page.
    #[error("assembly error: {message}")]
    Assembly { message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The raw product input could not be read as a JSON object.
    #[error("input error: {message}")]
    Input { message: String },

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PageGenError>;

impl PageGenError {
    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a transformation error from any displayable message.
    pub fn transformation(msg: impl Into<String>) -> Self {
        Self::Transformation {
            message: msg.into(),
        }
    }

    /// Create an unknown-block error for the given block name.
    pub fn unknown_block(name: impl Into<String>) -> Self {
        Self::UnknownBlock { name: name.into() }
    }

    /// Create an assembly error from any displayable message.
    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an input error from any displayable message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for PageGenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
