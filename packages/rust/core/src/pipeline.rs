//! End-to-end flows: `compile` (fragments → Quotes.csv) and `check`
//! (fragments → validation report).

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use quotebook_shared::{DatasetConfig, Result};

use crate::dataset::{self, BuiltDataset};
use crate::reference::ReferenceSets;
use crate::validate::{self, ValidationReport};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each fragment is parsed and appended.
    fn fragment_loaded(&self, path: &Path, current: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn fragment_loaded(&self, _path: &Path, _current: usize, _total: usize) {}
}

/// Inputs for the compile flow.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Dataset root holding the books directory.
    pub root: PathBuf,
    /// Layout and output settings.
    pub dataset: DatasetConfig,
    /// Validate before writing and refuse to write an invalid dataset.
    pub check: bool,
}

/// Result of the compile flow.
#[derive(Debug)]
pub struct CompileResult {
    /// Where the combined dataset was written.
    pub output_path: PathBuf,
    /// Number of fragments concatenated.
    pub fragment_count: usize,
    /// Number of rows written.
    pub row_count: usize,
    /// Present when `check` was requested.
    pub report: Option<ValidationReport>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Result of the check flow.
#[derive(Debug)]
pub struct CheckResult {
    /// Number of fragments concatenated.
    pub fragment_count: usize,
    /// Outcome of every check.
    pub report: ValidationReport,
    /// Total elapsed time.
    pub elapsed: Duration,
}

fn load(
    root: &Path,
    config: &DatasetConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuiltDataset> {
    progress.phase("Loading fragments");
    dataset::build_dataset(root, config, progress)
}

/// Build the combined dataset and write it to `<root>/<output_file>`.
///
/// Without `check` the file is written whatever its contents. With it, a
/// failing validation aborts before anything is written.
#[instrument(skip_all, fields(root = %options.root.display(), check = options.check))]
pub fn compile(options: &CompileOptions, progress: &dyn ProgressReporter) -> Result<CompileResult> {
    let start = Instant::now();
    let delimiter = options.dataset.delimiter_byte()?;

    let built = load(&options.root, &options.dataset, progress)?;

    let report = if options.check {
        progress.phase("Validating dataset");
        let report = validate::validate(&built.table, &ReferenceSets::maintained());
        Some(report.into_result()?)
    } else {
        None
    };

    progress.phase("Writing combined dataset");
    let output_path = options.dataset.output_path(&options.root);
    dataset::write_dataset(&built.table, &output_path, delimiter)?;

    let result = CompileResult {
        output_path,
        fragment_count: built.fragments.len(),
        row_count: built.table.len(),
        report,
        elapsed: start.elapsed(),
    };

    info!(
        output = %result.output_path.display(),
        fragments = result.fragment_count,
        rows = result.row_count,
        elapsed_ms = result.elapsed.as_millis(),
        "compile complete"
    );

    Ok(result)
}

/// Rebuild the dataset from fragments and validate it.
///
/// Never reads or writes the combined output file.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn check(
    root: &Path,
    config: &DatasetConfig,
    refs: &ReferenceSets,
    progress: &dyn ProgressReporter,
) -> Result<CheckResult> {
    let start = Instant::now();
    let built = load(root, config, progress)?;

    progress.phase("Validating dataset");
    let report = validate::validate(&built.table, refs);

    if report.passed() {
        info!(rows = report.rows, "all checks passed");
    } else {
        warn!(
            failed = report.failures().count(),
            total = report.outcomes.len(),
            "dataset failed validation"
        );
    }

    Ok(CheckResult {
        fragment_count: built.fragments.len(),
        report,
        elapsed: start.elapsed(),
    })
}
