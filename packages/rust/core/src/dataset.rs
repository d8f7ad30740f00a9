//! Fragment discovery, concatenation, and combined dataset I/O.
//!
//! Fragments are per-episode delimited files under
//! `<root>/<books_dir>/<season>/`. They are read in season order, then by
//! file name, and stacked into one [`Table`].

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use quotebook_shared::{DatasetConfig, QuotebookError, Result, Table};

use crate::pipeline::ProgressReporter;

/// One fragment that went into a combined table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSummary {
    /// Path of the fragment file.
    pub path: PathBuf,
    /// Number of data rows it contributed.
    pub rows: usize,
}

/// The combined table plus where its rows came from.
#[derive(Debug, Clone)]
pub struct BuiltDataset {
    /// Row-wise union of every fragment.
    pub table: Table,
    /// Fragments in the order they were appended.
    pub fragments: Vec<FragmentSummary>,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// List fragment files for every configured season.
///
/// Only direct children of each season directory are considered. A missing
/// season directory contributes no fragments.
pub fn discover_fragments(root: &Path, config: &DatasetConfig) -> Result<Vec<PathBuf>> {
    let mut fragments = Vec::new();

    for season_dir in config.season_dirs(root) {
        if !season_dir.is_dir() {
            warn!(season = %season_dir.display(), "season directory not found, skipping");
            continue;
        }
        let before = fragments.len();

        for entry in WalkDir::new(&season_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(season_dir.as_path()).to_path_buf();
                QuotebookError::io(path, e.into())
            })?;

            let path = entry.path();
            let matches_ext = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == config.extension);

            if matches_ext && path.is_file() {
                fragments.push(path.to_path_buf());
            }
        }

        debug!(
            season = %season_dir.display(),
            count = fragments.len() - before,
            "discovered fragments"
        );
    }

    Ok(fragments)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Parse one delimited file whose first row is the header.
///
/// Empty fields become null cells. Ragged rows, invalid UTF-8, a missing
/// header, or duplicate column names are parse errors.
pub fn read_fragment(path: &Path, delimiter: u8) -> Result<Table> {
    let file = File::open(path).map_err(|e| QuotebookError::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| QuotebookError::parse(path, format!("failed to read header: {e}")))?
        .iter()
        .map(String::from)
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(QuotebookError::parse(path, "missing header row"));
    }
    if let Some(dup) = first_duplicate(&headers) {
        return Err(QuotebookError::parse(
            path,
            format!("duplicate column name {dup:?}"),
        ));
    }

    let mut table = Table::new(headers);
    for (i, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| QuotebookError::parse(path, format!("row {}: {e}", i + 1)))?;
        let cells = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        table
            .push_row(cells)
            .map_err(|e| QuotebookError::parse(path, format!("row {}: {e}", i + 1)))?;
    }

    Ok(table)
}

fn first_duplicate(headers: &[String]) -> Option<&str> {
    headers
        .iter()
        .enumerate()
        .find(|(i, h)| headers[..*i].contains(h))
        .map(|(_, h)| h.as_str())
}

/// Re-read a combined dataset written by [`write_dataset`].
pub fn read_dataset(path: &Path, delimiter: u8) -> Result<Table> {
    read_fragment(path, delimiter)
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Discover, parse, and concatenate every fragment under `root`.
///
/// Stops at the first unreadable fragment or header mismatch.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn build_dataset(
    root: &Path,
    config: &DatasetConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuiltDataset> {
    let delimiter = config.delimiter_byte()?;
    let paths = discover_fragments(root, config)?;
    if paths.is_empty() {
        return Err(QuotebookError::NoFragments {
            root: root.join(&config.books_dir),
        });
    }

    let total = paths.len();
    let mut combined: Option<Table> = None;
    let mut fragments = Vec::with_capacity(total);

    for (i, path) in paths.into_iter().enumerate() {
        let table = read_fragment(&path, delimiter)?;
        let rows = table.len();

        match combined.as_mut() {
            Some(acc) => acc.append(table, &path)?,
            None => combined = Some(table),
        }

        progress.fragment_loaded(&path, i + 1, total);
        fragments.push(FragmentSummary { path, rows });
    }

    let table = combined.unwrap_or_default();
    info!(
        fragments = fragments.len(),
        rows = table.len(),
        "combined dataset built"
    );

    Ok(BuiltDataset { table, fragments })
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `table` to `path`, replacing any existing file.
///
/// Null cells are written as empty fields. Fields are quoted only when they
/// contain the delimiter, quotes, or line breaks.
#[instrument(skip_all, fields(path = %path.display(), rows = table.len()))]
pub fn write_dataset(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let file = File::create(path).map_err(|e| QuotebookError::io(path, e))?;
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(file);

    let to_io = |e: csv::Error| QuotebookError::io(path, std::io::Error::other(e));

    writer.write_record(table.headers()).map_err(to_io)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
            .map_err(to_io)?;
    }
    writer.flush().map_err(|e| QuotebookError::io(path, e))?;

    info!("combined dataset written");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentProgress;

    const HEADER: &str = "character|quote|nation|bending|episode|book";

    fn temp_root() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "quotebook-dataset-test-{}",
            uuid::Uuid::now_v7()
        ));
        for season in ["01_Water", "02_Earth", "03_Fire"] {
            std::fs::create_dir_all(dir.join("books").join(season)).unwrap();
        }
        dir
    }

    fn write_fragment(root: &Path, season: &str, name: &str, lines: &[&str]) -> PathBuf {
        let path = root.join("books").join(season).join(name);
        let mut content = String::from(HEADER);
        for line in lines {
            content.push('\n');
            content.push_str(line);
        }
        content.push('\n');
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn discovery_orders_seasons_then_file_names() {
        let root = temp_root();
        write_fragment(&root, "03_Fire", "01_The_Awakening.csv", &[]);
        write_fragment(&root, "01_Water", "02_The_Avatar_Returns.csv", &[]);
        write_fragment(&root, "01_Water", "01_The_Boy_in_the_Iceberg.csv", &[]);
        std::fs::write(root.join("books/01_Water/notes.txt"), "skip me").unwrap();
        std::fs::create_dir_all(root.join("books/02_Earth/nested.csv")).unwrap();

        let found = discover_fragments(&root, &DatasetConfig::default()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "01_The_Boy_in_the_Iceberg.csv",
                "02_The_Avatar_Returns.csv",
                "01_The_Awakening.csv",
            ]
        );

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_seasons_are_skipped() {
        let root = temp_root();
        std::fs::remove_dir_all(root.join("books/02_Earth")).unwrap();
        std::fs::remove_dir_all(root.join("books/03_Fire")).unwrap();
        write_fragment(&root, "01_Water", "a.csv", &["Aang|Hi.|Air|Air|E1|Water"]);

        let found = discover_fragments(&root, &DatasetConfig::default()).unwrap();
        assert_eq!(found.len(), 1);

        let built = build_dataset(&root, &DatasetConfig::default(), &SilentProgress).unwrap();
        assert_eq!(built.table.len(), 1);
        assert_eq!(built.table.rows()[0][0].as_deref(), Some("Aang"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn no_books_directory_is_no_fragments() {
        let root = temp_root();
        std::fs::remove_dir_all(root.join("books")).unwrap();

        let err = build_dataset(&root, &DatasetConfig::default(), &SilentProgress).unwrap_err();
        assert!(matches!(err, QuotebookError::NoFragments { .. }));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn two_fragments_concatenate_in_encounter_order() {
        let root = temp_root();
        write_fragment(
            &root,
            "01_Water",
            "e1.csv",
            &["Aang|Hi.|Air|Air|E1|Water"],
        );
        write_fragment(
            &root,
            "03_Fire",
            "e2.csv",
            &["Zuko|Honor.|Fire|Fire|E2|Fire"],
        );

        let built = build_dataset(&root, &DatasetConfig::default(), &SilentProgress).unwrap();
        assert_eq!(built.table.len(), 2);
        assert_eq!(built.table.rows()[0][0].as_deref(), Some("Aang"));
        assert_eq!(built.table.rows()[1][0].as_deref(), Some("Zuko"));
        assert_eq!(built.fragments.len(), 2);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn row_count_is_sum_of_fragment_rows() {
        let root = temp_root();
        write_fragment(
            &root,
            "01_Water",
            "a.csv",
            &[
                "Katara|One.|Water|Water|The Storm|Water",
                "Sokka|Two.|Water|None|The Storm|Water",
                "Sokka|Two.|Water|None|The Storm|Water",
            ],
        );
        write_fragment(&root, "02_Earth", "b.csv", &[]);
        write_fragment(
            &root,
            "02_Earth",
            "c.csv",
            &["Toph|Three.|Earth|Earth|The Blind Bandit|Earth"],
        );

        let built = build_dataset(&root, &DatasetConfig::default(), &SilentProgress).unwrap();
        let sum: usize = built.fragments.iter().map(|f| f.rows).sum();
        assert_eq!(sum, 4);
        assert_eq!(built.table.len(), sum);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn header_mismatch_is_fatal() {
        let root = temp_root();
        write_fragment(&root, "01_Water", "a.csv", &["Aang|Hi.|Air|Air|E1|Water"]);
        std::fs::write(
            root.join("books/02_Earth/b.csv"),
            "character|quote|nation|bending|episode\nToph|Hey.|Earth|Earth|E2\n",
        )
        .unwrap();

        let err = build_dataset(&root, &DatasetConfig::default(), &SilentProgress).unwrap_err();
        match err {
            QuotebookError::Schema { path, found, .. } => {
                assert!(path.ends_with("b.csv"));
                assert_eq!(found.len(), 5);
            }
            other => panic!("expected schema error, got {other}"),
        }

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn ragged_fragment_is_a_parse_error() {
        let root = temp_root();
        let path = write_fragment(&root, "01_Water", "a.csv", &["Aang|Hi.|Air"]);

        let err = read_fragment(&path, b'|').unwrap_err();
        assert!(matches!(err, QuotebookError::Parse { .. }));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn empty_file_and_duplicate_headers_are_rejected() {
        let root = temp_root();
        let empty = root.join("books/01_Water/empty.csv");
        std::fs::write(&empty, "").unwrap();
        assert!(matches!(
            read_fragment(&empty, b'|'),
            Err(QuotebookError::Parse { .. })
        ));

        let dup = root.join("books/01_Water/dup.csv");
        std::fs::write(&dup, "book|book\nWater|Water\n").unwrap();
        let err = read_fragment(&dup, b'|').unwrap_err();
        assert!(err.to_string().contains("duplicate column"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn no_fragments_is_an_error() {
        let root = temp_root();
        let err = build_dataset(&root, &DatasetConfig::default(), &SilentProgress).unwrap_err();
        assert!(matches!(err, QuotebookError::NoFragments { .. }));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn empty_fields_read_as_nulls() {
        let root = temp_root();
        let path = write_fragment(
            &root,
            "01_Water",
            "a.csv",
            &["Appa||None|Air|The Storm|Water"],
        );

        let table = read_fragment(&path, b'|').unwrap();
        assert_eq!(table.rows()[0][1], None);
        assert_eq!(table.null_counts()["quote"], 1);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn written_dataset_reads_back_identically() {
        let root = temp_root();
        write_fragment(
            &root,
            "01_Water",
            "a.csv",
            &[
                "Sokka|\"Boomerang|always comes back\"|Water|None|The Storm|Water",
                "Iroh|\"He said \"\"tea\"\".\"|Fire|Fire|The Storm|Water",
                "Momo||None|None|The Storm|Water",
            ],
        );

        let built = build_dataset(&root, &DatasetConfig::default(), &SilentProgress).unwrap();
        assert_eq!(
            built.table.rows()[0][1].as_deref(),
            Some("Boomerang|always comes back")
        );

        let out = root.join("Quotes.csv");
        std::fs::write(&out, "stale contents").unwrap();
        write_dataset(&built.table, &out, b'|').unwrap();

        let reread = read_dataset(&out, b'|').unwrap();
        assert_eq!(reread, built.table);

        let _ = std::fs::remove_dir_all(&root);
    }
}
