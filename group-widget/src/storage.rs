//! Storage engines and the stored element count.
//!
//! How composite group values are persisted is up to the host. The widget
//! only needs to know which engine a group uses and how many elements a row
//! already stores, so the form renders that many repeats.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GroupError, Result};

/// Supported storage engines for a group's composite value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    /// All elements serialized into the group's own column
    #[default]
    Serialized,
    /// Elements stored as related entity rows
    Entity,
}

impl StorageType {
    pub const ALL: [StorageType; 2] = [StorageType::Serialized, StorageType::Entity];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Serialized => "serialized",
            StorageType::Entity => "entity",
        }
    }

    /// Match a configured name against the whitelist.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts the element groups already persisted for a row.
pub trait ElementCounter {
    /// Number of stored elements of `field` on row `row_id` of `table`.
    /// A new or unsaved row has 0.
    fn count_elements(&self, table: &str, row_id: u64, field: &str) -> Result<usize>;
}

impl<F> ElementCounter for F
where
    F: Fn(&str, u64, &str) -> Result<usize>,
{
    fn count_elements(&self, table: &str, row_id: u64, field: &str) -> Result<usize> {
        self(table, row_id, field)
    }
}

/// Stored group values keyed by table → row id → field.
type Records = IndexMap<String, IndexMap<u64, IndexMap<String, Value>>>;

/// In-memory store of composite group values.
///
/// A stored value is the list of element maps the save hook produced, e.g.
/// `[{foo: "a", bar: 1}, {foo: "b", bar: 2}]` counts as two elements.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<(String, u64, String), Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the composite value of `field` on a row.
    pub fn insert(
        &mut self,
        table: impl Into<String>,
        row_id: u64,
        field: impl Into<String>,
        value: Value,
    ) {
        self.values.insert((table.into(), row_id, field.into()), value);
    }

    pub fn get(&self, table: &str, row_id: u64, field: &str) -> Option<&Value> {
        self.values.get(&(table.to_string(), row_id, field.to_string()))
    }

    /// Load stored values from YAML:
    ///
    /// ```yaml
    /// tl_foo:
    ///   123:
    ///     my_group: [{ foo: a }, { foo: b }]
    /// ```
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let records: Records = serde_yaml_ng::from_str(input)?;
        let mut storage = Self::new();
        for (table, rows) in records {
            for (row_id, fields) in rows {
                for (field, value) in fields {
                    storage.insert(table.clone(), row_id, field, value);
                }
            }
        }
        Ok(storage)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GroupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }
}

impl ElementCounter for MemoryStorage {
    fn count_elements(&self, table: &str, row_id: u64, field: &str) -> Result<usize> {
        let count = match self.get(table, row_id, field) {
            None | Some(Value::Null) => 0,
            Some(Value::Array(elements)) => elements.len(),
            Some(Value::Object(elements)) => elements.len(),
            Some(other) => {
                return Err(GroupError::Storage {
                    table: table.to_string(),
                    field: field.to_string(),
                    row_id,
                    message: format!("stored value is not a list of elements: {other}"),
                })
            }
        };
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn storage_type_whitelist() {
        assert_eq!(StorageType::parse("serialized"), Some(StorageType::Serialized));
        assert_eq!(StorageType::parse("entity"), Some(StorageType::Entity));
        assert_eq!(StorageType::parse("bookshelf"), None);
        assert_eq!(StorageType::default(), StorageType::Serialized);
        assert_eq!(StorageType::Entity.to_string(), "entity");
    }

    #[test]
    fn missing_and_null_rows_count_zero() {
        let mut storage = MemoryStorage::new();
        storage.insert("tl_foo", 1, "my_group", Value::Null);
        assert_eq!(storage.count_elements("tl_foo", 1, "my_group").unwrap(), 0);
        assert_eq!(storage.count_elements("tl_foo", 2, "my_group").unwrap(), 0);
    }

    #[test]
    fn counts_stored_elements() {
        let mut storage = MemoryStorage::new();
        storage.insert("tl_foo", 1, "my_group", json!([{"foo": "a"}, {"foo": "b"}, {"foo": "c"}]));
        assert_eq!(storage.count_elements("tl_foo", 1, "my_group").unwrap(), 3);
    }

    #[test]
    fn scalar_value_is_a_storage_error() {
        let mut storage = MemoryStorage::new();
        storage.insert("tl_foo", 1, "my_group", json!("garbage"));
        let err = storage.count_elements("tl_foo", 1, "my_group").unwrap_err();
        assert!(matches!(err, GroupError::Storage { row_id: 1, .. }));
    }

    #[test]
    fn loads_records_from_yaml() {
        let storage = MemoryStorage::from_yaml_str(
            r#"
tl_foo:
  123:
    my_group:
      - { foo: a }
      - { foo: b }
"#,
        )
        .unwrap();
        assert_eq!(storage.count_elements("tl_foo", 123, "my_group").unwrap(), 2);
    }

    #[test]
    fn closures_are_counters() {
        let counter = |_: &str, row_id: u64, _: &str| -> Result<usize> { Ok(row_id as usize) };
        assert_eq!(counter.count_elements("tl_foo", 4, "g").unwrap(), 4);
    }
}
