//! Encoded CSV writer.
//!
//! Serializes rows in their current order to delimited text and encodes
//! the result into a configurable target encoding. Characters the target
//! cannot represent are replaced rather than failing the write, matching
//! how the cleaned files were historically produced; encoding fidelity
//! across the load/write pair is the caller's responsibility.

use crate::error::{CleaningError, Result};
use encoding_rs::Encoding;
use polars::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Writes DataFrames as CSV in a configurable text encoding.
#[derive(Debug)]
pub struct TableWriter {
    encoding: &'static Encoding,
}

impl TableWriter {
    /// Create a writer for the given encoding label (e.g. "macintosh").
    pub fn new(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| CleaningError::UnknownEncoding(label.to_string()))?;
        Ok(Self { encoding })
    }

    /// Serialize the dataset to `path`, header included, rows unchanged.
    pub fn write(&self, df: &mut DataFrame, path: &Path) -> Result<()> {
        let write_error = |reason: String| CleaningError::Write {
            path: path.display().to_string(),
            reason,
        };

        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .with_separator(b',')
            .finish(df)
            .map_err(|e| write_error(e.to_string()))?;

        let text = String::from_utf8(buffer).map_err(|e| write_error(e.to_string()))?;

        let (encoded, _, had_errors) = self.encoding.encode(&text);
        if had_errors {
            warn!(
                "Some characters could not be represented in {} and were replaced",
                self.encoding.name()
            );
        }

        fs::write(path, &encoded).map_err(|e| write_error(e.to_string()))?;

        debug!(
            "Wrote {} ({} rows, {})",
            path.display(),
            df.height(),
            self.encoding.name()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_encoding_label() {
        let err = TableWriter::new("klingon").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_ENCODING");
    }

    #[test]
    fn test_unwritable_path_is_write_error() {
        let writer = TableWriter::new("utf-8").unwrap();
        let mut df = df!["a" => [1, 2]].unwrap();
        let err = writer
            .write(&mut df, Path::new("no/such/dir/out.csv"))
            .unwrap_err();
        assert_eq!(err.error_code(), "WRITE_ERROR");
    }
}
