//! Shared types, error model, and configuration for Quotebook.
//!
//! This crate is the foundation depended on by the other Quotebook crates.
//! It provides:
//! - [`QuotebookError`] — the unified error type
//! - The [`Table`] type holding fragment and combined datasets
//! - Configuration ([`AppConfig`], [`DatasetConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, DatasetConfig, config_file_path, init_config, load_config_for,
    load_config_from,
};
pub use error::{QuotebookError, Result};
pub use types::{Cell, Table};
