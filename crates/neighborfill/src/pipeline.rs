//! The cleaning pipeline.
//!
//! Ties the collaborators together for one input file:
//! convert -> load (+ marker normalization) -> impute -> optional sort ->
//! write. Conversion and loading failures are fatal for the file; sort
//! failures are downgraded to warnings and the dataset proceeds unsorted.

use crate::config::CleanConfig;
use crate::error::Result;
use crate::imputer::NeighborImputer;
use crate::io::{TableLoader, TableWriter, convert_to_csv};
use crate::report::RunSummary;
use crate::sorter::{ARRIVAL_MONTH_COLUMN, ARRIVAL_YEAR_COLUMN, Sorter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Runs the whole cleaning flow over one input file.
pub struct CleaningPipeline {
    config: CleanConfig,
}

impl CleaningPipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: CleanConfig) -> Self {
        Self { config }
    }

    /// Access the pipeline configuration.
    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    /// Clean one input file and return the run summary.
    pub fn run(&self, input: &Path) -> Result<RunSummary> {
        let start = Instant::now();
        info!("Processing {}", input.display());

        let csv_path = convert_to_csv(input)?;

        let loader = TableLoader::new(&self.config.input_encoding)?;
        let loaded = loader.load(&csv_path)?;
        let mut df = loaded.df;
        info!(
            "Loaded {} rows x {} columns ({} missing markers normalized)",
            df.height(),
            df.width(),
            loaded.normalized_markers
        );

        let mut imputer = match self.config.seed {
            Some(seed) => NeighborImputer::with_seed(self.config.window, seed),
            None => NeighborImputer::new(self.config.window),
        };
        let imputation = imputer.impute(&mut df)?;
        info!(
            "Replaced {} missing values ({} before, {} remaining)",
            imputation.total_replaced, imputation.missing_before, imputation.missing_after
        );

        let mut warnings = Vec::new();
        let sorted_by = self.sort_step(&mut df, &mut warnings)?;

        let output_path = self.output_path(&csv_path);
        let writer = TableWriter::new(&self.config.output_encoding)?;
        writer.write(&mut df, &output_path)?;
        info!("Cleaned file saved to {}", output_path.display());

        Ok(RunSummary {
            input_file: input.display().to_string(),
            output_file: Some(output_path.display().to_string()),
            files_processed: 1,
            rows_processed: df.height(),
            columns: df.width(),
            markers_normalized: loaded.normalized_markers,
            imputation,
            sorted_by,
            warnings,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Apply the configured sort, downgrading failures to warnings.
    ///
    /// Runs strictly after imputation. With no sort column configured, a
    /// dataset carrying arrival date columns is ordered chronologically.
    fn sort_step(
        &self,
        df: &mut polars::prelude::DataFrame,
        warnings: &mut Vec<String>,
    ) -> Result<Option<String>> {
        let attempt = if let Some(column) = &self.config.sort_column {
            Some((Sorter::sort_by_column(df, column), column.clone()))
        } else if self.config.auto_date_sort && Sorter::has_arrival_date_columns(df) {
            Some((
                Sorter::sort_chronologically(df, ARRIVAL_YEAR_COLUMN, ARRIVAL_MONTH_COLUMN),
                format!("{}, {}", ARRIVAL_YEAR_COLUMN, ARRIVAL_MONTH_COLUMN),
            ))
        } else {
            None
        };

        match attempt {
            None => Ok(None),
            Some((Ok(sorted), label)) => {
                *df = sorted;
                info!("Sorted by {}", label);
                Ok(Some(label))
            }
            Some((Err(err), label)) if err.is_sort_warning() => {
                warn!("Could not sort by {}: {}", label, err);
                warnings.push(format!("Could not sort by {}: {}", label, err));
                Ok(None)
            }
            Some((Err(err), _)) => Err(err),
        }
    }

    /// Where the cleaned file goes: the configured name, or
    /// `cleaned_<input name>` in the output directory.
    fn output_path(&self, csv_path: &Path) -> PathBuf {
        let file_name = match &self.config.output_name {
            Some(name) => name.clone(),
            None => {
                let base = csv_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("output.csv");
                format!("cleaned_{}", base)
            }
        };
        self.config.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleanConfig;

    #[test]
    fn test_output_path_default_name() {
        let config = CleanConfig::builder().output_dir("out").build().unwrap();
        let pipeline = CleaningPipeline::new(config);

        let path = pipeline.output_path(Path::new("data/scores.csv"));
        assert_eq!(path, PathBuf::from("out/cleaned_scores.csv"));
    }

    #[test]
    fn test_output_path_custom_name() {
        let config = CleanConfig::builder()
            .output_dir("out")
            .output_name("final.csv")
            .build()
            .unwrap();
        let pipeline = CleaningPipeline::new(config);

        let path = pipeline.output_path(Path::new("data/scores.csv"));
        assert_eq!(path, PathBuf::from("out/final.csv"));
    }

    #[test]
    fn test_unsupported_input_is_fatal() {
        let pipeline = CleaningPipeline::new(CleanConfig::default());
        let err = pipeline.run(Path::new("records.parquet")).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_missing_input_is_fatal_read_error() {
        let pipeline = CleaningPipeline::new(CleanConfig::builder()
            .input_encoding("utf-8")
            .build()
            .unwrap());
        let err = pipeline.run(Path::new("no/such/file.csv")).unwrap_err();
        assert_eq!(err.error_code(), "READ_ERROR");
    }
}
