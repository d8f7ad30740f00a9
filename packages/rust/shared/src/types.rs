//! Core domain types for Quotebook datasets.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{QuotebookError, Result};

/// A single cell. `None` is a missing value (an empty field on disk).
pub type Cell = Option<String>;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An in-memory delimited table: an ordered header plus rows of cells.
///
/// Every row holds exactly one cell per header column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Column names in order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one row, checking its width against the header.
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<()> {
        if cells.len() != self.headers.len() {
            return Err(QuotebookError::RowWidth {
                expected: self.headers.len(),
                found: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Concatenate `other` below this table.
    ///
    /// Both tables must have identical headers in the same order; `source`
    /// names where `other` came from for the error.
    pub fn append(&mut self, other: Table, source: &Path) -> Result<()> {
        if other.headers != self.headers {
            return Err(QuotebookError::Schema {
                path: source.to_path_buf(),
                expected: self.headers.clone(),
                found: other.headers,
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Unique non-null values of a column, or `None` if the column is absent.
    pub fn unique_values(&self, column: &str) -> Option<BTreeSet<String>> {
        let idx = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row[idx].clone())
                .collect(),
        )
    }

    /// Count of null cells per column. Columns without nulls are omitted.
    pub fn null_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            for (header, cell) in self.headers.iter().zip(row) {
                if cell.is_none() {
                    *counts.entry(header.clone()).or_insert(0) += 1;
                }
            }
        }
        counts
    }
}
