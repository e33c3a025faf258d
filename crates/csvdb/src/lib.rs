//! # csvdb
//!
//! Flat-file record store: one table per text file, one record per line.
//!
//! ## Model
//! - Columns end with a delimiter (`;` by default), rows are joined by a line
//!   separator (`\n` by default)
//! - Field names are either supplied up front or read from a header line
//! - Every operation reads the whole file; mutations rewrite the whole file
//! - Ids are assigned on insert as `max(id) + 1`
//! - No locking: concurrent writers lose updates (last write wins)

#![warn(missing_docs)]

mod error;
mod format;
mod parser;
mod record;
mod storage;

pub use error::{Error, Result};
pub use format::{Fields, Format, DEFAULT_DELIMITER, DEFAULT_LINE_SEPARATOR};
pub use parser::{flatten_records, parse_records};
pub use record::{Record, RecordId, ID_FIELD};
pub use storage::{Changes, CsvDb};
