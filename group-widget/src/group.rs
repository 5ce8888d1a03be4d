//! Group — a validated group field definition.
//!
//! Built fresh for every rendered edit form from the registry entry at
//! `table.fields[name]`. Validation happens entirely in [`Group::new`]; an
//! invalid definition never produces a `Group`.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::definition::{deep_merge, Definition};
use crate::error::{GroupError, InvalidReason, Result};
use crate::hooks::GroupHooks;
use crate::registry::DcaRegistry;
use crate::storage::StorageType;

/// A validated group field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    name: String,
    table: String,
    row_id: u64,
    label: String,
    description: String,
    min_elements: usize,
    max_elements: usize,
    storage: StorageType,
    fields: Vec<String>,
    definitions: IndexMap<String, Definition>,
    #[serde(skip)]
    hooks: GroupHooks,
}

impl Group {
    /// Read and validate the group `name` of `table` for the row being edited.
    pub fn new(registry: &DcaRegistry, table: &str, row_id: u64, name: &str) -> Result<Self> {
        let table_config = registry.table(table)?;
        let raw = table_config
            .field(name)
            .ok_or_else(|| GroupError::FieldNotFound {
                table: table.to_string(),
                name: name.to_string(),
            })?;
        let invalid = |reason| GroupError::invalid(name, reason);

        let overrides: Definition = match raw.get("fields") {
            None | Some(Value::Null) => Definition::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(invalid(InvalidReason::NotAMap("fields".into()))),
        };
        let palette = palette_entries(raw.get("palette")).map_err(invalid)?;

        let fields: Vec<String> = if !palette.is_empty() {
            palette
        } else if !overrides.is_empty() {
            overrides.keys().cloned().collect()
        } else {
            return Err(invalid(InvalidReason::EmptyPaletteAndFields));
        };

        let mut definitions = IndexMap::with_capacity(fields.len());
        for field in &fields {
            let base = table_config.field(field);
            let own = overrides.get(field).filter(|v| !v.is_null());
            if base.is_none() && own.is_none() {
                return Err(invalid(InvalidReason::UnknownField(field.clone())));
            }

            let mut merged = base.cloned().unwrap_or_default();
            match own {
                None => {}
                Some(Value::Object(own)) => deep_merge(&mut merged, own),
                Some(_) => {
                    return Err(invalid(InvalidReason::NotAMap(format!("fields.{field}"))));
                }
            }
            if definitions.insert(field.clone(), merged).is_some() {
                return Err(invalid(InvalidReason::DuplicateField(field.clone())));
            }
        }

        let min = integer(raw, "min").map_err(invalid)?;
        let max = integer(raw, "max").map_err(invalid)?;
        if min < 0 {
            return Err(invalid(InvalidReason::MinBelowZero));
        }
        if max != 0 && max < min {
            return Err(invalid(InvalidReason::MaxBelowMin));
        }

        let storage = match raw.get("storage") {
            None | Some(Value::Null) => StorageType::default(),
            Some(Value::String(value)) => StorageType::parse(value)
                .ok_or_else(|| invalid(InvalidReason::UnknownStorage(value.clone())))?,
            Some(other) => return Err(invalid(InvalidReason::UnknownStorage(other.to_string()))),
        };

        let (label, description) = label_and_description(raw.get("label"));

        debug!(
            table,
            row_id,
            group = name,
            fields = fields.len(),
            min,
            max,
            %storage,
            "group definition validated"
        );

        Ok(Self {
            name: name.to_string(),
            table: table.to_string(),
            row_id,
            label,
            description,
            // Both checked non-negative above
            min_elements: min as usize,
            max_elements: max.max(0) as usize,
            storage,
            fields,
            definitions,
            hooks: GroupHooks::default(),
        })
    }

    /// Use `hooks` instead of the default listener callbacks.
    pub fn with_hooks(mut self, hooks: GroupHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn row_id(&self) -> u64 {
        self.row_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn min_elements(&self) -> usize {
        self.min_elements
    }

    /// Upper bound of repeats; 0 means unbounded.
    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage
    }

    /// Sub-field names, in palette order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The registry definition of `name` with the group's own overrides
    /// deep-merged on top.
    pub fn field_definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn hooks(&self) -> &GroupHooks {
        &self.hooks
    }
}

/// Entries of `palette`. Absent or `null` is an empty palette.
fn palette_entries(value: Option<&Value>) -> std::result::Result<Vec<String>, InvalidReason> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.clone()),
                other => Err(InvalidReason::UnknownField(other.to_string())),
            })
            .collect(),
        Some(_) => Err(InvalidReason::NotAList("palette")),
    }
}

/// An optional integer key, defaulting to 0.
fn integer(raw: &Definition, key: &'static str) -> std::result::Result<i64, InvalidReason> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i),
            // Whole-number floats such as `2.0`
            (None, Some(f)) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(f as i64)
            }
            _ => Err(InvalidReason::NotAnInteger(key)),
        },
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| InvalidReason::NotAnInteger(key)),
        Some(_) => Err(InvalidReason::NotAnInteger(key)),
    }
}

/// `label: [label, description]` or a bare `label: text`.
fn label_and_description(value: Option<&Value>) -> (String, String) {
    fn part(items: &[Value], i: usize) -> String {
        items
            .get(i)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
    match value {
        Some(Value::Array(items)) => (part(items, 0), part(items, 1)),
        Some(Value::String(label)) => (label.clone(), String::new()),
        _ => (String::new(), String::new()),
    }
}
