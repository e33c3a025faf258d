//! # csvfacade
//!
//! Thin async front for a csvdb table.
//!
//! Callers get the four table operations (`get`, `insert`, `update`,
//! `delete`) without depending on how the store is constructed. Every call
//! goes straight through to [`csvdb::CsvDb`].

#![warn(missing_docs)]

mod facade;

pub use csvdb::{Changes, Error, Fields, Format, Record, RecordId, Result};
pub use facade::{CsvFacade, Rows};
