//! Custom error types for the cleaning pipeline.
//!
//! All error kinds originate in the collaborators around the imputer
//! (conversion, loading, writing, sorting); imputation itself is a total
//! function over well-formed tables and never raises. Errors carry a stable
//! code and serialize as `{code, message}` so callers can distinguish, for
//! example, "zero rows because the file was empty" from "zero rows because
//! loading failed".

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Input path missing, unreadable, wrongly encoded, or malformed.
    #[error("Failed to read '{path}': {reason}")]
    Read { path: String, reason: String },

    /// File extension not recognized by the format converter.
    #[error("Unsupported file format '{0}' (expected csv, xls, xlsx, or json)")]
    UnsupportedFormat(String),

    /// Text encoding label not known to the encoding table.
    #[error("Unknown text encoding label '{0}'")]
    UnknownEncoding(String),

    /// Output path unwritable or serialization failed.
    #[error("Failed to write '{path}': {reason}")]
    Write { path: String, reason: String },

    /// Column was not found in the dataset (e.g. a sort target).
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Sorting failed; callers treat this as a non-fatal warning.
    #[error("Failed to sort by '{column}': {reason}")]
    SortFailed { column: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "READ_ERROR",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::UnknownEncoding(_) => "UNKNOWN_ENCODING",
            Self::Write { .. } => "WRITE_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::SortFailed { .. } => "SORT_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a sort failure.
    ///
    /// Sort failures are non-fatal: the pipeline records a warning and
    /// proceeds with the unsorted (but fully imputed) dataset.
    pub fn is_sort_warning(&self) -> bool {
        match self {
            Self::SortFailed { .. } | Self::ColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_sort_warning(),
            _ => false,
        }
    }
}

/// Serialize implementation emitting `{code, message}` pairs.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = CleaningError::Read {
            path: "data.csv".to_string(),
            reason: "no such file".to_string(),
        };
        assert_eq!(err.error_code(), "READ_ERROR");
        assert_eq!(
            CleaningError::UnsupportedFormat("parquet".to_string()).error_code(),
            "UNSUPPORTED_FORMAT"
        );
        assert_eq!(
            CleaningError::ColumnNotFound("score".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_sort_warning() {
        let err = CleaningError::SortFailed {
            column: "score".to_string(),
            reason: "mixed types".to_string(),
        };
        assert!(err.is_sort_warning());
        assert!(CleaningError::ColumnNotFound("score".to_string()).is_sort_warning());
        assert!(
            !CleaningError::Write {
                path: "out.csv".to_string(),
                reason: "disk full".to_string()
            }
            .is_sort_warning()
        );
    }

    #[test]
    fn test_sort_warning_survives_context() {
        let err = CleaningError::ColumnNotFound("score".to_string()).with_context("While sorting");
        assert!(err.is_sort_warning());
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_error_serialization() {
        let err = CleaningError::UnknownEncoding("latin9000".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("UNKNOWN_ENCODING"));
        assert!(json.contains("latin9000"));
    }

    #[test]
    fn test_with_context() {
        let err = CleaningError::UnsupportedFormat("pdf".to_string())
            .with_context("While converting input");
        assert!(err.to_string().contains("While converting input"));
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }
}
