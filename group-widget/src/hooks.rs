//! Named callback references attached to generated definitions.
//!
//! The widget never calls these. It writes them into the registry and the
//! host resolves `[service, method]` pairs at render/load/save time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `[service, method]` callback reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Hook {
    pub service: String,
    pub method: String,
}

impl Hook {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
        }
    }

    /// The hook as a registry value: `["service", "method"]`.
    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::String(self.service.clone()),
            Value::String(self.method.clone()),
        ])
    }
}

impl From<(String, String)> for Hook {
    fn from((service, method): (String, String)) -> Self {
        Self { service, method }
    }
}

impl From<Hook> for (String, String) {
    fn from(hook: Hook) -> Self {
        (hook.service, hook.method)
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.service, self.method)
    }
}

const LISTENER: &str = "group_widget.listener";

/// The hooks a group attaches while expanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupHooks {
    /// Appended to every sub-field's `load_callback` list
    pub load: Hook,
    /// Appended to every sub-field's `save_callback` list
    pub save: Hook,
    /// `input_field_callback` of every delimiter field
    pub render: Hook,
}

impl Default for GroupHooks {
    fn default() -> Self {
        Self {
            load: Hook::new(LISTENER, "onLoadGroupField"),
            save: Hook::new(LISTENER, "onStoreGroupField"),
            render: Hook::new(LISTENER, "onRenderDelimiter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hook_serializes_as_pair() {
        let hook = Hook::new("my.service", "onLoad");
        assert_eq!(serde_json::to_value(&hook).unwrap(), json!(["my.service", "onLoad"]));
        assert_eq!(hook.to_value(), json!(["my.service", "onLoad"]));

        let parsed: Hook = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(parsed, Hook::new("a", "b"));
        assert_eq!(parsed.to_string(), "a::b");
    }

    #[test]
    fn partial_hooks_fall_back_to_defaults() {
        let hooks: GroupHooks =
            serde_yaml_ng::from_str("save: [custom.listener, onSave]\n").unwrap();
        assert_eq!(hooks.save, Hook::new("custom.listener", "onSave"));
        assert_eq!(hooks.load, GroupHooks::default().load);
        assert_eq!(hooks.render, GroupHooks::default().render);
    }
}
