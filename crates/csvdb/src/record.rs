//! Records and record identifiers

use std::fmt;

/// Name of the field the store assigns on insert
pub const ID_FIELD: &str = "id";

/// A single row: field names mapped to string values, in key order.
///
/// A value may be *undefined*: the field list declares it but the row ran out
/// of columns before reaching it. Undefined values keep their key position and
/// serialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, Option<String>)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, or to undefined when `value` is `None`.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Set `key` to a defined value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, Some(value.into()));
    }

    /// Declare `key` without a value
    pub fn set_undefined(&mut self, key: impl Into<String>) {
        self.insert(key, None);
    }

    /// Value of `key`; `None` when the key is absent or undefined
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// True if `key` is present, defined or not
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Remove `key`, returning its value if it had one
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        self.entries.remove(pos).1
    }

    /// Field names in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(name, value)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of fields, defined or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The record's `id` value
    pub fn id(&self) -> Option<&str> {
        self.get(ID_FIELD)
    }

    /// Shallow merge: every field of `other` overwrites the same-named field
    /// here (undefined included); fields only present here survive.
    pub fn merge(&mut self, other: &Record) {
        for (key, value) in &other.entries {
            self.insert(key.clone(), value.clone());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}

/// Identifier used to look up rows.
///
/// Stored ids are plain strings, so every comparison happens on the string
/// form: `RecordId::from(2)` matches a row whose id is `"2"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// String form of the id
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `record` carries this id
    pub fn matches(&self, record: &Record) -> bool {
        record.id() == Some(self.as_str())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId(id)
    }
}

impl From<&String> for RecordId {
    fn from(id: &String) -> Self {
        RecordId(id.clone())
    }
}

macro_rules! record_id_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RecordId {
                fn from(id: $t) -> Self {
                    RecordId(id.to_string())
                }
            }
        )*
    };
}

record_id_from_int!(u32, u64, usize, i32, i64);
