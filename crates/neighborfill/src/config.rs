//! Configuration for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default text encoding used when reading input files.
pub const DEFAULT_INPUT_ENCODING: &str = "latin1";

/// Default text encoding used when writing cleaned files.
pub const DEFAULT_OUTPUT_ENCODING: &str = "macintosh";

/// Default neighbor-search window, in rows per direction.
pub const DEFAULT_WINDOW: usize = 5;

/// Configuration for the cleaning pipeline.
///
/// Use [`CleanConfig::builder()`] to create a new configuration
/// with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use neighborfill::CleanConfig;
///
/// let config = CleanConfig::builder()
///     .window(3)
///     .seed(42)
///     .sort_column("score")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
    /// How many rows to scan above and below a missing cell before
    /// falling back to a column-wide draw.
    /// Default: 5
    pub window: usize,

    /// Text encoding label for reading input files (WHATWG label,
    /// e.g. "latin1", "utf-8").
    /// Default: "latin1"
    pub input_encoding: String,

    /// Text encoding label for writing the cleaned file.
    /// Default: "macintosh"
    pub output_encoding: String,

    /// Column to sort by after imputation. Numeric columns sort
    /// descending, textual columns ascending.
    /// Default: None
    pub sort_column: Option<String>,

    /// When no sort column is set and the dataset carries arrival date
    /// columns, sort chronologically by year and month name.
    /// Default: true
    pub auto_date_sort: bool,

    /// Directory the cleaned file is written into.
    /// Default: "."
    pub output_dir: PathBuf,

    /// Custom output file name (with extension).
    /// If None, uses "cleaned_<input name>.csv".
    /// Default: None
    pub output_name: Option<String>,

    /// Seed for the random neighbor choice. When set, runs are fully
    /// reproducible; when None, a fresh entropy-seeded source is used.
    /// Default: None
    pub seed: Option<u64>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            input_encoding: DEFAULT_INPUT_ENCODING.to_string(),
            output_encoding: DEFAULT_OUTPUT_ENCODING.to_string(),
            sort_column: None,
            auto_date_sort: true,
            output_dir: PathBuf::from("."),
            output_name: None,
            seed: None,
        }
    }
}

impl CleanConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanConfigBuilder {
        CleanConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.window == 0 {
            return Err(ConfigValidationError::InvalidWindow(self.window));
        }

        if Encoding::for_label(self.input_encoding.as_bytes()).is_none() {
            return Err(ConfigValidationError::UnknownEncodingLabel(
                self.input_encoding.clone(),
            ));
        }

        if Encoding::for_label(self.output_encoding.as_bytes()).is_none() {
            return Err(ConfigValidationError::UnknownEncodingLabel(
                self.output_encoding.clone(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid window size: {0} (must be at least 1)")]
    InvalidWindow(usize),

    #[error("Unknown text encoding label: '{0}'")]
    UnknownEncodingLabel(String),
}

/// Builder for [`CleanConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanConfigBuilder {
    window: Option<usize>,
    input_encoding: Option<String>,
    output_encoding: Option<String>,
    sort_column: Option<String>,
    auto_date_sort: Option<bool>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    seed: Option<u64>,
}

impl CleanConfigBuilder {
    /// Set the neighbor-search window (rows per direction).
    pub fn window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    /// Set the text encoding label for reading input files.
    pub fn input_encoding(mut self, label: impl Into<String>) -> Self {
        self.input_encoding = Some(label.into());
        self
    }

    /// Set the text encoding label for writing the cleaned file.
    pub fn output_encoding(mut self, label: impl Into<String>) -> Self {
        self.output_encoding = Some(label.into());
        self
    }

    /// Set the column to sort by after imputation.
    pub fn sort_column(mut self, column: impl Into<String>) -> Self {
        self.sort_column = Some(column.into());
        self
    }

    /// Enable or disable the chronological fallback sort.
    pub fn auto_date_sort(mut self, enable: bool) -> Self {
        self.auto_date_sort = Some(enable);
        self
    }

    /// Set the output directory for the cleaned file.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom output file name (with extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Set the seed for the random neighbor choice.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanConfig, ConfigValidationError> {
        let config = CleanConfig {
            window: self.window.unwrap_or(DEFAULT_WINDOW),
            input_encoding: self
                .input_encoding
                .unwrap_or_else(|| DEFAULT_INPUT_ENCODING.to_string()),
            output_encoding: self
                .output_encoding
                .unwrap_or_else(|| DEFAULT_OUTPUT_ENCODING.to_string()),
            sort_column: self.sort_column,
            auto_date_sort: self.auto_date_sort.unwrap_or(true),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_name: self.output_name,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}
