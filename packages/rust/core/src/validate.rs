//! Dataset validation against the maintained reference sets.
//!
//! Every check runs independently: a failing check never stops the others,
//! so a single report shows everything that is out of sync.

use serde::Serialize;
use tracing::{debug, warn};

use quotebook_shared::{QuotebookError, Result, Table};

use crate::reference::{ColumnRule, ReferenceSets};

/// Name of the check asserting there are no null cells.
pub const NO_NULLS_CHECK: &str = "no_nulls";

/// A single reason a check failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Values present in the column but not in the reference set.
    UnexpectedValues { values: Vec<String> },
    /// Reference values that never occur in the column.
    MissingValues { values: Vec<String> },
    /// The column does not exist in the dataset.
    MissingColumn { column: String },
    /// A column holds null cells.
    NullCells { column: String, count: usize },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedValues { values } => write!(f, "unexpected values: {values:?}"),
            Self::MissingValues { values } => write!(f, "missing values: {values:?}"),
            Self::MissingColumn { column } => write!(f, "column {column:?} not found"),
            Self::NullCells { column, count } => {
                write!(f, "{count} null cell(s) in column {column:?}")
            }
        }
    }
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Check name, e.g. `characters` or `no_nulls`.
    pub name: String,
    /// Everything wrong; empty when the check passed.
    pub findings: Vec<Finding>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Outcome of every check run over one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Rows in the validated table.
    pub rows: usize,
    /// One outcome per check, null check first.
    pub outcomes: Vec<CheckOutcome>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CheckOutcome::passed)
    }

    /// Checks that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// Turn a failing report into a [`QuotebookError::Validation`].
    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            return Ok(self);
        }
        let failed: Vec<&str> = self.failures().map(|o| o.name.as_str()).collect();
        Err(QuotebookError::validation(format!(
            "{} check(s) failed: {}",
            failed.len(),
            failed.join(", ")
        )))
    }
}

/// Assert no cell anywhere in the table is null.
pub fn check_no_nulls(table: &Table) -> CheckOutcome {
    let findings = table
        .null_counts()
        .into_iter()
        .map(|(column, count)| Finding::NullCells { column, count })
        .collect();

    CheckOutcome {
        name: NO_NULLS_CHECK.into(),
        findings,
    }
}

/// Compare a column's unique non-null values to the rule's expected set.
pub fn check_column(table: &Table, rule: &ColumnRule) -> CheckOutcome {
    let Some(observed) = table.unique_values(&rule.column) else {
        return CheckOutcome {
            name: rule.name.clone(),
            findings: vec![Finding::MissingColumn {
                column: rule.column.clone(),
            }],
        };
    };

    let mut findings = Vec::new();

    let unexpected: Vec<String> = observed.difference(&rule.expected).cloned().collect();
    if !unexpected.is_empty() {
        findings.push(Finding::UnexpectedValues { values: unexpected });
    }

    let missing: Vec<String> = rule.expected.difference(&observed).cloned().collect();
    if !missing.is_empty() {
        findings.push(Finding::MissingValues { values: missing });
    }

    CheckOutcome {
        name: rule.name.clone(),
        findings,
    }
}

/// Run the null check and every column rule.
pub fn validate(table: &Table, refs: &ReferenceSets) -> ValidationReport {
    let mut outcomes = Vec::with_capacity(refs.rules.len() + 1);
    outcomes.push(check_no_nulls(table));
    outcomes.extend(refs.rules.iter().map(|rule| check_column(table, rule)));

    for outcome in &outcomes {
        if outcome.passed() {
            debug!(check = %outcome.name, "check passed");
        } else {
            warn!(
                check = %outcome.name,
                findings = outcome.findings.len(),
                "check failed"
            );
        }
    }

    ValidationReport {
        rows: table.len(),
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::dataset::build_dataset;
    use crate::pipeline::SilentProgress;
    use quotebook_shared::DatasetConfig;

    fn row(values: [&str; 5]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| (!v.is_empty()).then(|| v.to_string()))
            .collect()
    }

    fn scenario_table() -> Table {
        let mut table = Table::new(
            ["character", "nation", "bending", "episode", "book"]
                .map(String::from)
                .to_vec(),
        );
        table
            .push_row(row(["Aang", "Air", "Air", "E1", "Water"]))
            .unwrap();
        table
            .push_row(row(["Zuko", "Fire", "Fire", "E2", "Fire"]))
            .unwrap();
        table
    }

    #[test]
    fn scenario_character_check_passes() {
        let rule = ColumnRule::new("characters", "character", &["Aang", "Zuko"]);
        let outcome = check_column(&scenario_table(), &rule);
        assert!(outcome.passed());
    }

    #[test]
    fn column_check_reports_both_directions() {
        let rule = ColumnRule::new("characters", "character", &["Aang", "Katara"]);
        let outcome = check_column(&scenario_table(), &rule);
        assert_eq!(
            outcome.findings,
            vec![
                Finding::UnexpectedValues {
                    values: vec!["Zuko".into()]
                },
                Finding::MissingValues {
                    values: vec!["Katara".into()]
                },
            ]
        );
    }

    #[test]
    fn missing_column_fails_its_check() {
        let rule = ColumnRule::new("seasons", "season", &["1"]);
        let outcome = check_column(&scenario_table(), &rule);
        assert!(matches!(
            outcome.findings.as_slice(),
            [Finding::MissingColumn { column }] if column == "season"
        ));
    }

    #[test]
    fn null_cells_fail_only_the_null_check() {
        let mut table = scenario_table();
        table
            .push_row(row(["Aang", "Air", "", "E1", "Water"]))
            .unwrap();

        let refs = ReferenceSets::new(vec![
            ColumnRule::new("characters", "character", &["Aang", "Zuko"]),
            ColumnRule::new("bending_styles", "bending", &["Air", "Fire"]),
        ]);
        let report = validate(&table, &refs);

        assert!(!report.passed());
        let failed: Vec<_> = report.failures().map(|o| o.name.as_str()).collect();
        assert_eq!(failed, vec![NO_NULLS_CHECK]);
        assert_eq!(
            report.outcomes[0].findings,
            vec![Finding::NullCells {
                column: "bending".into(),
                count: 1
            }]
        );
    }

    #[test]
    fn all_checks_run_after_a_failure() {
        let refs = ReferenceSets::new(vec![
            ColumnRule::new("characters", "character", &["Katara"]),
            ColumnRule::new("books", "book", &["Earth"]),
            ColumnRule::new("nations", "nation", &["Air", "Fire"]),
        ]);
        let report = validate(&scenario_table(), &refs);

        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.failures().count(), 2);

        let err = report.into_result().unwrap_err();
        assert!(err.to_string().contains("characters, books"));
    }

    #[test]
    fn report_serializes_findings_with_kind_tag() {
        let rule = ColumnRule::new("books", "book", &["Water"]);
        let report = ValidationReport {
            rows: 2,
            outcomes: vec![check_column(&scenario_table(), &rule)],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["outcomes"][0]["findings"][0]["kind"],
            "unexpected_values"
        );
        assert_eq!(json["outcomes"][0]["findings"][0]["values"][0], "Fire");
    }

    fn fixtures_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
    }

    #[test]
    fn fixture_dataset_passes_every_maintained_check() {
        let built = build_dataset(&fixtures_root(), &DatasetConfig::default(), &SilentProgress)
            .expect("build fixture dataset");
        let report = validate(&built.table, &ReferenceSets::maintained());

        for outcome in &report.outcomes {
            assert!(
                outcome.passed(),
                "{} failed: {:?}",
                outcome.name,
                outcome.findings
            );
        }
        assert_eq!(report.outcomes.len(), 6);
    }

    #[test]
    fn fixture_dataset_has_exact_nation_book_and_bending_sets() {
        let built = build_dataset(&fixtures_root(), &DatasetConfig::default(), &SilentProgress)
            .expect("build fixture dataset");
        let table = &built.table;

        let nations: Vec<_> = table.unique_values("nation").unwrap().into_iter().collect();
        assert_eq!(nations, vec!["Air", "Earth", "Fire", "None", "Water"]);

        let books: Vec<_> = table.unique_values("book").unwrap().into_iter().collect();
        assert_eq!(books, vec!["Earth", "Fire", "Water"]);

        let bending = table.unique_values("bending").unwrap();
        assert_eq!(bending.len(), 6);
        assert!(bending.contains("All"));
        assert!(table.null_counts().is_empty());
    }
}
