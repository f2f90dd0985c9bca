//! Table I/O: format conversion, encoded loading, encoded writing.

mod convert;
mod loader;
mod writer;

pub use convert::convert_to_csv;
pub use loader::{LoadedTable, TableLoader};
pub use writer::TableWriter;
