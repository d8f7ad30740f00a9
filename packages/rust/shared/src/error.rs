//! Error types for Quotebook.
//!
//! Library crates use [`QuotebookError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Quotebook operations.
#[derive(Debug, thiserror::Error)]
pub enum QuotebookError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A fragment or dataset file is not valid delimited text.
    #[error("parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A fragment's header disagrees with the tables already combined.
    #[error("schema mismatch in {path:?}: expected columns {expected:?}, found {found:?}")]
    Schema {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A row does not have one cell per column.
    #[error("row has {found} cells but table has {expected} columns")]
    RowWidth { expected: usize, found: usize },

    /// Discovery found no fragment files at all.
    #[error("no fragment files found under {root:?}")]
    NoFragments { root: PathBuf },

    /// The repository root could not be determined.
    #[error("repository root error: {message}")]
    RepositoryRoot { message: String },

    /// Dataset contents failed one or more reference checks.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QuotebookError>;

impl QuotebookError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error for the given file.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a repository root error from any displayable message.
    pub fn repository_root(msg: impl Into<String>) -> Self {
        Self::RepositoryRoot {
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
