//! CsvFacade: pass-through wrapper around CsvDb

use std::path::Path;

use csvdb::{Changes, CsvDb, Fields, Format, Record, RecordId, Result};

/// Result of [`CsvFacade::get`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rows {
    /// Every record, when no id was given
    All(Vec<Record>),
    /// The record with the requested id, if there is one
    One(Option<Record>),
}

impl Rows {
    /// All records, or the single record as a one-element list
    pub fn into_vec(self) -> Vec<Record> {
        match self {
            Rows::All(records) => records,
            Rows::One(record) => record.into_iter().collect(),
        }
    }
}

/// Table access without touching the store's constructor
#[derive(Debug, Clone)]
pub struct CsvFacade {
    db: CsvDb,
}

impl CsvFacade {
    /// Create a facade for the table at `path`
    ///
    /// # Arguments
    /// * `path` - Table file path
    /// * `fields` - Field names, or `None` to read them from the header line
    pub fn new<P: AsRef<Path>>(path: P, fields: Option<Vec<String>>) -> Self {
        Self {
            db: CsvDb::new(path, Fields::from(fields)),
        }
    }

    /// Replace the default `;` / `\n` framing
    pub fn with_format(self, format: Format) -> Self {
        Self {
            db: self.db.with_format(format),
        }
    }

    /// Underlying store
    pub fn db(&self) -> &CsvDb {
        &self.db
    }

    /// Fetch every record, or one record by id.
    ///
    /// An unknown id resolves to `Rows::One(None)`, not an error.
    pub async fn get(&self, id: Option<RecordId>) -> Result<Rows> {
        match id {
            Some(id) => self.db.get_by_id(id).await.map(Rows::One),
            None => self.db.read_all().await.map(Rows::All),
        }
    }

    /// Insert a record and return its new id
    pub async fn insert(&self, record: Record) -> Result<u64> {
        self.db.insert(record).await
    }

    /// Merge one record or a batch into the rows with matching ids
    pub async fn update(&self, changes: impl Into<Changes>) -> Result<()> {
        self.db.update(changes).await
    }

    /// Delete the first record with the given id
    pub async fn delete(&self, id: impl Into<RecordId>) -> Result<()> {
        self.db.delete(id).await
    }
}
