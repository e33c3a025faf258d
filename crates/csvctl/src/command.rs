//! Subcommands and JSON conversion

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use csvfacade::{Changes, CsvFacade, Record, Rows};
use serde_json::{Map, Value};
use tracing::info;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the table file if it does not exist
    Init,

    /// Print every record, or the record with the given id
    Get {
        /// Record id
        id: Option<String>,
    },

    /// Insert a JSON object and print its new id
    Insert {
        /// Record as a JSON object, e.g. '{"name":"foo"}'
        json: String,
    },

    /// Merge a JSON object (or an array of objects) into rows with matching ids
    Update {
        /// Changes as a JSON object or array; each needs an "id"
        json: String,
    },

    /// Delete the first record with the given id
    Delete {
        /// Record id
        id: String,
    },
}

/// Run a command, returning what should be printed to stdout
pub async fn run(facade: &CsvFacade, command: Command) -> Result<Option<Value>> {
    let path = facade.db().path().display().to_string();

    match command {
        Command::Init => {
            facade.db().create_if_missing().await?;
            info!("Table ready: {}", path);
            Ok(None)
        }
        Command::Get { id } => {
            let rows = facade.get(id.map(Into::into)).await?;
            Ok(Some(rows_to_json(rows)))
        }
        Command::Insert { json } => {
            let record = record_from_json(parse_json(&json)?)?;
            let id = facade.insert(record).await?;
            info!("Inserted record {} into {}", id, path);
            Ok(Some(Value::from(id)))
        }
        Command::Update { json } => {
            let changes = changes_from_json(parse_json(&json)?)?;
            facade.update(changes).await?;
            info!("Updated {}", path);
            Ok(None)
        }
        Command::Delete { id } => {
            facade.delete(id.as_str()).await?;
            info!("Deleted record {} from {}", id, path);
            Ok(None)
        }
    }
}

fn parse_json(input: &str) -> Result<Value> {
    serde_json::from_str(input).context("invalid JSON argument")
}

fn scalar_to_string(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => bail!("field '{}' must be a scalar, got {}", key, other),
    }
}

/// Build a record from a JSON object. Scalars become strings, `null` becomes
/// an undefined value, key order is kept.
pub fn record_from_json(value: Value) -> Result<Record> {
    let map = match value {
        Value::Object(map) => map,
        other => bail!("expected a JSON object, got {}", other),
    };

    let mut record = Record::new();
    for (key, value) in map {
        let value = scalar_to_string(&key, value)?;
        record.insert(key, value);
    }
    Ok(record)
}

/// Build update changes from a JSON object or an array of objects
pub fn changes_from_json(value: Value) -> Result<Changes> {
    match value {
        Value::Array(items) => {
            let records = items
                .into_iter()
                .map(record_from_json)
                .collect::<Result<Vec<_>>>()?;
            Ok(Changes::Many(records))
        }
        other => Ok(Changes::One(record_from_json(other)?)),
    }
}

/// Render a record as a JSON object; undefined values become `null`
pub fn record_to_json(record: &Record) -> Value {
    let map: Map<String, Value> = record
        .iter()
        .map(|(key, value)| {
            let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
            (key.to_string(), value)
        })
        .collect();
    Value::Object(map)
}

fn rows_to_json(rows: Rows) -> Value {
    match rows {
        Rows::All(records) => Value::Array(records.iter().map(record_to_json).collect()),
        Rows::One(Some(record)) => record_to_json(&record),
        Rows::One(None) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn fixture(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_record_from_json_keeps_order() {
        let record = record_from_json(json!({"name": "foo", "age": 3, "admin": false})).unwrap();

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["name", "age", "admin"]);
        assert_eq!(record.get("age"), Some("3"));
        assert_eq!(record.get("admin"), Some("false"));
    }

    #[test]
    fn test_record_from_json_null_is_undefined() {
        let record = record_from_json(json!({"name": null})).unwrap();

        assert!(record.contains_key("name"));
        assert_eq!(record.get("name"), None);
    }

    #[test]
    fn test_record_from_json_rejects_nested() {
        assert!(record_from_json(json!({"name": {"first": "a"}})).is_err());
        assert!(record_from_json(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_changes_from_json() {
        let one = changes_from_json(json!({"id": 1, "name": "a"})).unwrap();
        assert!(matches!(one, Changes::One(_)));

        let many = changes_from_json(json!([{"id": 1}, {"id": "2"}])).unwrap();
        match many {
            Changes::Many(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records[0].id(), Some("1"));
            }
            other => panic!("expected a batch, got {:?}", other),
        }
    }

    #[test]
    fn test_record_to_json() {
        let mut record: Record = [("id", "1")].into_iter().collect();
        record.set_undefined("name");

        assert_eq!(record_to_json(&record), json!({"id": "1", "name": null}));
    }

    #[tokio::test]
    async fn test_run_crud() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        let facade = CsvFacade::new(&path, None);

        assert_eq!(run(&facade, Command::Init).await.unwrap(), None);

        let id = run(
            &facade,
            Command::Insert {
                json: r#"{"name":"foo","password":"bar"}"#.to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(id, Some(json!(1)));

        run(
            &facade,
            Command::Update {
                json: r#"{"id":1,"name":"baz"}"#.to_string(),
            },
        )
        .await
        .unwrap();

        let all = run(&facade, Command::Get { id: None }).await.unwrap();
        assert_eq!(
            all,
            Some(json!([{"name": "baz", "password": "bar", "id": "1"}]))
        );

        run(&facade, Command::Delete { id: "1".to_string() })
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[tokio::test]
    async fn test_run_get_unknown_id() {
        let (_dir, path) = fixture("id;name;\n1;foo;");
        let facade = CsvFacade::new(&path, None);

        let result = run(
            &facade,
            Command::Get {
                id: Some("7".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(result, Some(Value::Null));
    }

    #[tokio::test]
    async fn test_run_update_without_id_fails() {
        let (_dir, path) = fixture("id;name;\n1;foo;");
        let facade = CsvFacade::new(&path, None);

        let result = run(
            &facade,
            Command::Update {
                json: r#"{"name":"bar"}"#.to_string(),
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id;name;\n1;foo;");
    }
}
