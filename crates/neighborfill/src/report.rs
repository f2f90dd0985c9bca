//! Run reporting types.
//!
//! [`ImputationReport`] is computed once per imputer run and describes what
//! was filled; [`RunSummary`] wraps it with the surrounding pipeline facts
//! (files, rows, sorting, warnings, timing). Both serialize for the CLI's
//! `--json` and `--emit-report` outputs.

use crate::error::{CleaningError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Replacements made in one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnFill {
    /// Column name
    pub column: String,
    /// Number of missing cells replaced
    pub replaced: usize,
}

/// Per-run account of what the imputer replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationReport {
    /// Replacement counts, in column order
    pub columns: Vec<ColumnFill>,
    /// Total replacements across all columns
    pub total_replaced: usize,
    /// Missing cells before imputation (canonical sentinel only)
    pub missing_before: usize,
    /// Missing cells remaining after imputation
    pub missing_after: usize,
}

impl ImputationReport {
    /// Replacement count for one column (0 for unknown columns).
    pub fn replaced_in(&self, column: &str) -> usize {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.replaced)
            .unwrap_or(0)
    }
}

/// Summary of a whole cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Path to the input file as given
    pub input_file: String,
    /// Path the cleaned file was written to
    pub output_file: Option<String>,
    /// Number of files processed in this run
    pub files_processed: usize,
    /// Rows in the processed dataset
    pub rows_processed: usize,
    /// Columns in the processed dataset
    pub columns: usize,
    /// Missing-marker strings rewritten to null during loading
    pub markers_normalized: usize,
    /// What the imputer replaced
    pub imputation: ImputationReport,
    /// Column the output was sorted by, if any sort applied
    pub sorted_by: Option<String>,
    /// Non-fatal problems encountered (e.g. a skipped sort)
    pub warnings: Vec<String>,
    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

/// Write a run summary as pretty JSON to `<output_dir>/<base>_report.json`.
pub fn write_summary_to_file(
    summary: &RunSummary,
    output_dir: &Path,
    report_base_name: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let report_path = output_dir.join(format!("{}_report.json", report_base_name));
    let mut file = File::create(&report_path).map_err(|e| CleaningError::Write {
        path: report_path.display().to_string(),
        reason: e.to_string(),
    })?;
    file.write_all(serde_json::to_string_pretty(summary)?.as_bytes())
        .map_err(|e| CleaningError::Write {
            path: report_path.display().to_string(),
            reason: e.to_string(),
        })?;

    info!("Report saved: {}", report_path.display());

    Ok(report_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ImputationReport {
        ImputationReport {
            columns: vec![
                ColumnFill {
                    column: "score".to_string(),
                    replaced: 2,
                },
                ColumnFill {
                    column: "city".to_string(),
                    replaced: 0,
                },
            ],
            total_replaced: 2,
            missing_before: 2,
            missing_after: 0,
        }
    }

    #[test]
    fn test_replaced_in() {
        let report = sample_report();
        assert_eq!(report.replaced_in("score"), 2);
        assert_eq!(report.replaced_in("city"), 0);
        assert_eq!(report.replaced_in("unknown"), 0);
    }

    #[test]
    fn test_summary_round_trips_through_json() {
        let summary = RunSummary {
            input_file: "data.csv".to_string(),
            output_file: Some("cleaned_data.csv".to_string()),
            files_processed: 1,
            rows_processed: 4,
            columns: 2,
            markers_normalized: 2,
            imputation: sample_report(),
            sorted_by: None,
            warnings: vec!["Could not sort by 'score'".to_string()],
            duration_ms: 12,
        };

        let json = serde_json::to_string(&summary).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rows_processed, 4);
        assert_eq!(back.imputation.total_replaced, 2);
        assert_eq!(back.warnings.len(), 1);
    }
}
