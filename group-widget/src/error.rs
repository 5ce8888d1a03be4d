//! Error types for group definitions and expansion

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for group widget operations
pub type Result<T> = std::result::Result<T, GroupError>;

/// Why a group definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// Neither a `palette` list nor a `fields` map was given
    EmptyPaletteAndFields,
    /// A palette entry names a field defined nowhere
    UnknownField(String),
    /// A palette entry appears twice
    DuplicateField(String),
    /// `min` or `max` is present but not an integer
    NotAnInteger(&'static str),
    /// `palette` is present but not a list
    NotAList(&'static str),
    /// `fields`, or one of its entries, is present but not a map
    NotAMap(String),
    MinBelowZero,
    MaxBelowMin,
    UnknownStorage(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::EmptyPaletteAndFields => {
                write!(f, "Keys 'palette' and 'fields' cannot both be empty.")
            }
            InvalidReason::UnknownField(name) => write!(f, "Field '{name}' does not exist."),
            InvalidReason::DuplicateField(name) => {
                write!(f, "Field '{name}' is listed more than once.")
            }
            InvalidReason::NotAnInteger(key) => write!(f, "Key '{key}' must be an integer."),
            InvalidReason::NotAList(key) => write!(f, "Key '{key}' must be a list."),
            InvalidReason::NotAMap(key) => write!(f, "Key '{key}' must be a map."),
            InvalidReason::MinBelowZero => write!(f, "Key 'min' cannot be less than 0."),
            InvalidReason::MaxBelowMin => write!(f, "Key 'max' cannot be less than 'min'."),
            InvalidReason::UnknownStorage(value) => write!(f, "Unknown storage type '{value}'."),
        }
    }
}

/// Errors that can occur while building or expanding a group
#[derive(Debug, Error)]
pub enum GroupError {
    /// The group's own definition is malformed
    #[error("Invalid definition for group '{group}': {reason}")]
    InvalidDefinition { group: String, reason: InvalidReason },

    /// Table not present in the registry
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    /// Field not present in the table's registry
    #[error("field not found: {table}.{name}")]
    FieldNotFound { table: String, name: String },

    /// Palette not present in the table's registry
    #[error("palette not found: {table}.{palette}")]
    PaletteNotFound { table: String, palette: String },

    /// The element count query failed
    #[error("storage error for {table}.{field} (row {row_id}): {message}")]
    Storage {
        table: String,
        field: String,
        row_id: u64,
        message: String,
    },

    /// Failed to read a registry or records file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Widget settings could not be extracted
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl GroupError {
    pub(crate) fn invalid(group: &str, reason: InvalidReason) -> Self {
        GroupError::InvalidDefinition {
            group: group.to_string(),
            reason,
        }
    }

    /// The rejection reason, if this is a definition error.
    pub fn reason(&self) -> Option<&InvalidReason> {
        match self {
            GroupError::InvalidDefinition { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl From<figment::Error> for GroupError {
    fn from(error: figment::Error) -> Self {
        GroupError::Config(Box::new(error))
    }
}
