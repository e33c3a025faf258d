//! Error types for csvdb

use std::fmt;
use std::io;

/// Result type alias for csvdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store operations
///
/// A missing record is never an error: lookups resolve to `None` and
/// update/delete against an unknown id leave the rows untouched.
#[derive(Debug)]
pub enum Error {
    /// I/O error while reading or rewriting the table file
    Io(io::Error),

    /// Parse error
    Parse(String),

    /// Delimiter or line separator cannot be used to frame rows
    InvalidFormat(String),

    /// A record passed to update carries no `id` field
    MissingId,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
            Error::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            Error::MissingId => write!(f, "Record has no id field"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Error::Parse(format!("{:?}", err))
    }
}
