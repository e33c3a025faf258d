//! Storage engine implementation
//!
//! One table is one text file. Every operation reads the whole file, works on
//! the parsed records in memory and, for mutations, rewrites the whole file.
//! Nothing is cached between calls.
//!
//! ## Concurrency
//!
//! There is no locking. Two operations in flight against the same path (through
//! one handle or several) may interleave their read and write phases, and the
//! last write wins: two concurrent inserts can compute the same id and one row
//! is lost. Callers that share a table between tasks must serialize access
//! themselves, e.g. behind a `tokio::sync::Mutex`.

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{Fields, Format};
use crate::parser::{flatten_records, parse_id, parse_records};
use crate::record::{Record, RecordId, ID_FIELD};

/// Records passed to [`CsvDb::update`]: a single record or a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Changes {
    /// One record
    One(Record),
    /// Several records, applied in order
    Many(Vec<Record>),
}

impl Changes {
    fn into_vec(self) -> Vec<Record> {
        match self {
            Changes::One(record) => vec![record],
            Changes::Many(records) => records,
        }
    }
}

impl From<Record> for Changes {
    fn from(record: Record) -> Self {
        Changes::One(record)
    }
}

impl From<Vec<Record>> for Changes {
    fn from(records: Vec<Record>) -> Self {
        Changes::Many(records)
    }
}

/// CsvDb is the table handle
#[derive(Debug, Clone)]
pub struct CsvDb {
    /// Path to the table file
    path: PathBuf,

    /// Field-list mode, fixed for the lifetime of the handle
    fields: Fields,

    /// Delimiter and line separator
    format: Format,
}

impl CsvDb {
    /// Create a handle for the table at `path`.
    ///
    /// The file is not touched until the first operation.
    pub fn new<P: AsRef<Path>>(path: P, fields: Fields) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            fields,
            format: Format::default(),
        }
    }

    /// Handle whose field names come from the file's header line
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::new(path, Fields::InferFromHeader)
    }

    /// Handle with an explicit field list; the file has no header line
    pub fn with_fields<P, I, S>(path: P, fields: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(path, Fields::explicit(fields))
    }

    /// Replace the default `;` / `\n` framing
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Path to the table file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Field-list mode
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Text framing
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Create the table file empty if it does not exist yet.
    ///
    /// An existing file is left as it is.
    pub async fn create_if_missing(&self) -> Result<()> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .open(&self.path)
            .await?;
        Ok(())
    }

    /// Read the raw table text
    pub async fn read_content(&self) -> Result<String> {
        let content = fs::read_to_string(&self.path).await?;
        debug!(path = %self.path.display(), bytes = content.len(), "read table");
        Ok(content)
    }

    /// Parse table text with this handle's field list and format
    pub fn parse(&self, input: &str) -> Result<Vec<Record>> {
        parse_records(input, &self.fields, &self.format)
    }

    /// Serialize records with this handle's format
    pub fn flatten(&self, records: &[Record]) -> String {
        flatten_records(records, &self.format)
    }

    /// Read every record in the table
    pub async fn read_all(&self) -> Result<Vec<Record>> {
        let content = self.read_content().await?;
        self.parse(&content)
    }

    /// Look up a record by id.
    ///
    /// Ids compare as strings. If several rows share the id, the last one wins.
    pub async fn get_by_id(&self, id: impl Into<RecordId>) -> Result<Option<Record>> {
        let id = id.into();
        let records = self.read_all().await?;
        Ok(records.into_iter().rev().find(|record| id.matches(record)))
    }

    /// The id the next insert would receive
    pub async fn next_id(&self) -> Result<u64> {
        let records = self.read_all().await?;
        Ok(next_id_of(&records))
    }

    /// Append a record and return the id assigned to it.
    ///
    /// Any `id` carried by `record` is overwritten.
    pub async fn insert(&self, mut record: Record) -> Result<u64> {
        let mut records = self.read_all().await?;
        let id = next_id_of(&records);

        record.set(ID_FIELD, id.to_string());
        records.push(record);

        self.write_all(&records).await?;
        debug!(path = %self.path.display(), id, "inserted record");
        Ok(id)
    }

    /// Merge changes into the records with matching ids.
    ///
    /// Each change overwrites the fields it carries and leaves the rest alone.
    /// Changes whose id matches no row are ignored. The file is rewritten even
    /// when nothing matched.
    pub async fn update(&self, changes: impl Into<Changes>) -> Result<()> {
        let changes = changes.into().into_vec();
        if changes.iter().any(|change| change.id().is_none()) {
            return Err(Error::MissingId);
        }

        let mut records = self.read_all().await?;
        let mut merged = 0usize;

        for change in &changes {
            let id = change.id();
            for record in records.iter_mut().filter(|record| record.id() == id) {
                record.merge(change);
                merged += 1;
            }
        }

        self.write_all(&records).await?;
        debug!(path = %self.path.display(), changes = changes.len(), merged, "updated records");
        Ok(())
    }

    /// Remove the first record with the given id.
    ///
    /// An unknown id leaves the rows untouched but still rewrites the file.
    pub async fn delete(&self, id: impl Into<RecordId>) -> Result<()> {
        let id = id.into();
        let mut records = self.read_all().await?;

        let removed = match records.iter().position(|record| id.matches(record)) {
            Some(pos) => {
                records.remove(pos);
                true
            }
            None => false,
        };

        self.write_all(&records).await?;
        debug!(path = %self.path.display(), %id, removed, "deleted record");
        Ok(())
    }

    /// Overwrite the table with `records`
    pub async fn write_all(&self, records: &[Record]) -> Result<()> {
        let content = self.flatten(records);
        fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), rows = records.len(), "wrote table");
        Ok(())
    }
}

/// `max(id) + 1`, where ids that do not parse or are negative count as 0.
/// Ids beyond `u64` clamp the result to `u64::MAX`.
fn next_id_of(records: &[Record]) -> u64 {
    let max = records
        .iter()
        .filter_map(|record| record.id().and_then(parse_id))
        .fold(0i128, i128::max);

    u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1)
}
