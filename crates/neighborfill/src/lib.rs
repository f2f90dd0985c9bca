//! CSV Cleaning Library
//!
//! Fills missing values in tabular data by substituting each missing cell
//! with a value randomly drawn from nearby non-missing cells in the same
//! column, then persists the result. Built with Rust and Polars.
//!
//! # Overview
//!
//! - **Marker normalization**: empty strings and the literals `"NULL"`,
//!   `"null"`, `"None"` collapse into the canonical missing sentinel
//! - **Neighbor imputation**: each missing cell draws uniformly from its
//!   nearest non-missing neighbor above and below (bounded window, default
//!   5 rows per direction), falling back to a column-wide draw
//! - **Format conversion**: Excel and JSON inputs convert to CSV first
//! - **Encoded I/O**: input and output text encodings are configurable
//! - **Post-imputation sorting**: optional, non-fatal on failure
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use neighborfill::{CleanConfig, CleaningPipeline};
//! use std::path::Path;
//!
//! let config = CleanConfig::builder()
//!     .output_dir("out")
//!     .seed(42)
//!     .build()?;
//!
//! let summary = CleaningPipeline::new(config).run(Path::new("data.csv"))?;
//! println!(
//!     "{} rows, {} values replaced",
//!     summary.rows_processed, summary.imputation.total_replaced
//! );
//! ```
//!
//! # Determinism
//!
//! Which cells end up non-missing is fully determined by the input; the
//! values chosen are randomized. Set a seed (or inject your own random
//! source through [`NeighborImputer::with_rng`]) for reproducible fills.

pub mod config;
pub mod error;
pub mod imputer;
pub mod io;
pub mod missing;
pub mod pipeline;
pub mod report;
pub mod sorter;

// Re-exports for convenient access
pub use config::{CleanConfig, CleanConfigBuilder, ConfigValidationError};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputer::NeighborImputer;
pub use io::{LoadedTable, TableLoader, TableWriter, convert_to_csv};
pub use missing::{MISSING_MARKERS, count_missing, normalize_missing};
pub use pipeline::CleaningPipeline;
pub use report::{ColumnFill, ImputationReport, RunSummary, write_summary_to_file};
pub use sorter::{ARRIVAL_MONTH_COLUMN, ARRIVAL_YEAR_COLUMN, Sorter, month_index};
