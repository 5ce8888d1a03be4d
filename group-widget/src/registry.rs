//! DcaRegistry — the table-scoped field and palette store.
//!
//! Stands in for the host's global configuration array. A registry is built
//! once per request, read while constructing groups and written by expansion.
//!
//! ```yaml
//! tl_foo:
//!   palettes:
//!     default: "{title_legend},title;my_group"
//!   fields:
//!     title: { inputType: text }
//!     my_group: { inputType: group, palette: [title] }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::definition::Definition;
use crate::error::{GroupError, Result};

/// The `inputType` that marks a group field.
pub const GROUP_INPUT_TYPE: &str = "group";

/// Configuration of a single table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub palettes: IndexMap<String, String>,
    #[serde(default)]
    pub fields: IndexMap<String, Definition>,
    /// Any other table-level keys, carried through untouched
    #[serde(flatten)]
    pub other: Definition,
}

impl TableConfig {
    pub fn field(&self, name: &str) -> Option<&Definition> {
        self.fields.get(name)
    }

    /// Register a definition, returning the one it replaced.
    pub fn insert_field(&mut self, name: impl Into<String>, def: Definition) -> Option<Definition> {
        self.fields.insert(name.into(), def)
    }

    pub fn palette(&self, name: &str) -> Option<&str> {
        self.palettes.get(name).map(String::as_str)
    }

    pub fn set_palette(&mut self, name: impl Into<String>, palette: impl Into<String>) {
        self.palettes.insert(name.into(), palette.into());
    }

    /// The table as YAML, in the same shape [`DcaRegistry::from_yaml_str`] reads.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Names of all fields whose `inputType` is `group`, in registry order.
    pub fn group_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, def)| {
                def.get("inputType").and_then(Value::as_str) == Some(GROUP_INPUT_TYPE)
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Field and palette registry for every table, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DcaRegistry {
    tables: IndexMap<String, TableConfig>,
}

impl DcaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(input)?)
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a registry file. `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GroupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };
        debug!(path = %path.display(), tables = registry.tables.len(), "registry loaded");
        Ok(registry)
    }

    pub fn table(&self, name: &str) -> Result<&TableConfig> {
        self.tables.get(name).ok_or_else(|| GroupError::TableNotFound {
            table: name.to_string(),
        })
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut TableConfig> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| GroupError::TableNotFound {
                table: name.to_string(),
            })
    }

    /// Get or create a table.
    pub fn table_entry(&mut self, name: impl Into<String>) -> &mut TableConfig {
        self.tables.entry(name.into()).or_default()
    }

    /// Look up a single field definition.
    pub fn field(&self, table: &str, name: &str) -> Option<&Definition> {
        self.tables.get(table).and_then(|t| t.field(name))
    }
}
