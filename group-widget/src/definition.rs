//! Raw field definitions and their deep merge.
//!
//! Sub-field shapes are owned by the host, so definitions stay untyped:
//! an insertion-ordered JSON object (`serde_json` with `preserve_order`).

use serde_json::{Map, Value};

/// A raw, host-defined field definition (`inputType`, `eval`, `label`, ...).
pub type Definition = Map<String, Value>;

/// Overlay `overlay` onto `base` in place.
///
/// Objects merge key by key, recursively. Scalars and lists in the overlay
/// replace the base value wholesale. Keys only present in `base` are kept
/// at their original position; new keys are appended.
pub fn deep_merge(base: &mut Definition, overlay: &Definition) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                deep_merge(existing, nested);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Borrow `key` as an object, replacing any non-object value with `{}`.
pub(crate) fn object_entry<'a>(def: &'a mut Definition, key: &str) -> &'a mut Definition {
    let slot = def
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just normalized to an object"),
    }
}

/// Borrow `key` as a list, wrapping a lone value and replacing `null`.
pub(crate) fn list_entry<'a>(def: &'a mut Definition, key: &str) -> &'a mut Vec<Value> {
    let slot = def.entry(key.to_string()).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    } else if !slot.is_array() {
        let lone = slot.take();
        *slot = Value::Array(vec![lone]);
    }
    match slot {
        Value::Array(list) => list,
        _ => unreachable!("slot was just normalized to a list"),
    }
}
