//! Table configuration: text framing and field-list mode

use crate::error::{Error, Result};

/// Default column delimiter
pub const DEFAULT_DELIMITER: char = ';';

/// Default line separator
pub const DEFAULT_LINE_SEPARATOR: &str = "\n";

/// How rows and columns are framed in the table file.
///
/// There is no quoting or escaping: a value containing the delimiter or the
/// line separator corrupts the row it is written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    delimiter: char,
    line_separator: String,
}

impl Format {
    /// Build a format, rejecting framings that cannot separate rows
    pub fn new(delimiter: char, line_separator: impl Into<String>) -> Result<Self> {
        let line_separator = line_separator.into();

        if line_separator.is_empty() {
            return Err(Error::InvalidFormat("line separator is empty".to_string()));
        }
        if line_separator.contains(delimiter) {
            return Err(Error::InvalidFormat(format!(
                "delimiter {:?} occurs in line separator {:?}",
                delimiter, line_separator
            )));
        }

        Ok(Self {
            delimiter,
            line_separator,
        })
    }

    /// Column delimiter
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Line separator
    pub fn line_separator(&self) -> &str {
        &self.line_separator
    }
}

impl Default for Format {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            line_separator: DEFAULT_LINE_SEPARATOR.to_string(),
        }
    }
}

/// Where a table's field names come from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Fields {
    /// Names supplied by the caller; every line of the file is a data row
    Explicit(Vec<String>),
    /// Names taken from the first line of the file on every read
    #[default]
    InferFromHeader,
}

impl Fields {
    /// Explicit field list from anything string-like
    pub fn explicit<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Fields::Explicit(fields.into_iter().map(Into::into).collect())
    }
}

impl From<Option<Vec<String>>> for Fields {
    fn from(fields: Option<Vec<String>>) -> Self {
        match fields {
            Some(fields) => Fields::Explicit(fields),
            None => Fields::InferFromHeader,
        }
    }
}
