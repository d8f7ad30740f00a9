//! Dataset layout configuration for Quotebook.
//!
//! An optional `quotebook.toml` lives at the dataset root. An explicit
//! `--config` path overrides it; missing files fall back to defaults that
//! describe the standard `books/<season>/*.csv` layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuotebookError, Result};

/// Default configuration file name, looked up at the dataset root.
pub const CONFIG_FILE_NAME: &str = "quotebook.toml";

// ---------------------------------------------------------------------------
// Config structs (matching quotebook.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fragment layout and output settings.
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// `[dataset]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Directory under the root holding the season directories.
    #[serde(default = "default_books_dir")]
    pub books_dir: String,

    /// Season directory names, scanned in this order.
    #[serde(default = "default_seasons")]
    pub seasons: Vec<String>,

    /// Fragment file extension (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Field separator for fragments and the combined output.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Combined dataset file name, written at the root.
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            books_dir: default_books_dir(),
            seasons: default_seasons(),
            extension: default_extension(),
            delimiter: default_delimiter(),
            output_file: default_output_file(),
        }
    }
}

fn default_books_dir() -> String {
    "books".into()
}
fn default_seasons() -> Vec<String> {
    vec!["01_Water".into(), "02_Earth".into(), "03_Fire".into()]
}
fn default_extension() -> String {
    "csv".into()
}
fn default_delimiter() -> String {
    "|".into()
}
fn default_output_file() -> String {
    "Quotes.csv".into()
}

impl DatasetConfig {
    /// The delimiter as a single byte, as the CSV reader and writer need it.
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(QuotebookError::config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }

    /// Season directories under `root`, in scan order.
    pub fn season_dirs(&self, root: &Path) -> Vec<PathBuf> {
        let books = root.join(&self.books_dir);
        self.seasons.iter().map(|s| books.join(s)).collect()
    }

    /// Where the combined dataset is written.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_file)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file for a dataset root.
pub fn config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Resolve the config for `root`.
///
/// An explicit path must exist. Otherwise `<root>/quotebook.toml` is used
/// when present, and defaults when not.
pub fn load_config_for(root: &Path, explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let path = config_file_path(root);
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QuotebookError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        QuotebookError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    // Reject a bad delimiter at load time rather than mid-run.
    config.dataset.delimiter_byte()?;
    Ok(config)
}

/// Write a default config file at the dataset root.
/// Returns the path to the created file.
pub fn init_config(root: &Path) -> Result<PathBuf> {
    let path = config_file_path(root);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| QuotebookError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| QuotebookError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
