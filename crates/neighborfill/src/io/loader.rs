//! Encoded CSV loader.
//!
//! Reads a CSV file in a declared text encoding, parses it into a
//! DataFrame, and normalizes the missing-marker spellings before handing
//! the table on. The imputer downstream only ever sees the canonical
//! missing sentinel.

use crate::error::{CleaningError, Result};
use crate::missing::normalize_missing;
use encoding_rs::Encoding;
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// A loaded table together with its normalization account.
#[derive(Debug)]
pub struct LoadedTable {
    /// The parsed dataset, missing markers already collapsed to null
    pub df: DataFrame,
    /// How many marker strings were rewritten during loading
    pub normalized_markers: usize,
}

/// Loads CSV files in a configurable text encoding.
#[derive(Debug)]
pub struct TableLoader {
    encoding: &'static Encoding,
}

impl TableLoader {
    /// Create a loader for the given encoding label (e.g. "latin1").
    pub fn new(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| CleaningError::UnknownEncoding(label.to_string()))?;
        Ok(Self { encoding })
    }

    /// Load and normalize one CSV file.
    ///
    /// The whole file is decoded strictly: bytes that are not valid in the
    /// declared encoding fail the load rather than silently mangling data.
    pub fn load(&self, path: &Path) -> Result<LoadedTable> {
        let read_error = |reason: String| CleaningError::Read {
            path: path.display().to_string(),
            reason,
        };

        let bytes = fs::read(path).map_err(|e| read_error(e.to_string()))?;

        let text = self
            .encoding
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .ok_or_else(|| {
                read_error(format!("file is not valid {}", self.encoding.name()))
            })?;

        let mut df = CsvReadOptions::default()
            .with_infer_schema_length(Some(100))
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(text.into_owned()))
            .finish()
            .map_err(|e| read_error(e.to_string()))?;

        debug!(
            "Loaded {} ({} rows x {} columns, {})",
            path.display(),
            df.height(),
            df.width(),
            self.encoding.name()
        );

        let normalized_markers = normalize_missing(&mut df)?;

        Ok(LoadedTable {
            df,
            normalized_markers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_encoding_label() {
        let err = TableLoader::new("latin9000").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_ENCODING");
    }

    #[test]
    fn test_known_encoding_labels() {
        assert!(TableLoader::new("latin1").is_ok());
        assert!(TableLoader::new("utf-8").is_ok());
        assert!(TableLoader::new("macintosh").is_ok());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let loader = TableLoader::new("utf-8").unwrap();
        let err = loader.load(Path::new("no/such/file.csv")).unwrap_err();
        assert_eq!(err.error_code(), "READ_ERROR");
    }
}
