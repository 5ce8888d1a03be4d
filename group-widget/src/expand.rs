//! Expansion of a group into concrete fields and palette tokens.
//!
//! For a group `g` with fields `[a, b]` repeated twice, the palette token `g`
//! becomes:
//!
//! ```text
//! g__(start),
//!   g__(el_start)__1,g__a__1,g__b__1,g__(el_end)__1,
//!   g__(el_start)__2,g__a__2,g__b__2,g__(el_end)__2,
//! g__(end)
//! ```
//!
//! Data fields carry the merged sub-field definition plus the group's load
//! and save hooks. Delimiters carry only a render hook.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, trace, warn};

use crate::definition::{list_entry, object_entry, Definition};
use crate::error::{GroupError, Result};
use crate::group::Group;
use crate::hooks::{GroupHooks, Hook};
use crate::palette;
use crate::registry::DcaRegistry;
use crate::storage::ElementCounter;

/// A zero-data marker field bracketing the group or one of its elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Start,
    ElementStart(usize),
    ElementEnd(usize),
    End,
}

impl Delimiter {
    pub fn kind(&self) -> &'static str {
        match self {
            Delimiter::Start => "start",
            Delimiter::ElementStart(_) => "el_start",
            Delimiter::ElementEnd(_) => "el_end",
            Delimiter::End => "end",
        }
    }

    /// 1-based element index, for element delimiters.
    pub fn element(&self) -> Option<usize> {
        match self {
            Delimiter::ElementStart(i) | Delimiter::ElementEnd(i) => Some(*i),
            Delimiter::Start | Delimiter::End => None,
        }
    }

    /// `group__(kind)` or `group__(kind)__i`.
    pub fn field_name(&self, group: &str) -> String {
        match self.element() {
            Some(i) => format!("{group}__({})__{i}", self.kind()),
            None => format!("{group}__({})", self.kind()),
        }
    }

    /// Registry definition: the render hook plus what it should render.
    pub fn definition(&self, group: &str, render: &Hook) -> Definition {
        let mut marker = Definition::new();
        marker.insert("group".into(), json!(group));
        marker.insert("kind".into(), json!(self.kind()));
        if let Some(i) = self.element() {
            marker.insert("element".into(), json!(i));
        }

        let mut def = Definition::new();
        def.insert("input_field_callback".into(), render.to_value());
        def.insert("group_delimiter".into(), Value::Object(marker));
        def
    }
}

/// Name of the `i`-th (1-based) instance of sub-field `field`.
pub fn data_field_name(group: &str, field: &str, i: usize) -> String {
    format!("{group}__{field}__{i}")
}

/// Number of repeats to render: at least `min`, at most `max` unless 0.
pub fn repeat_count(stored: usize, min: usize, max: usize) -> usize {
    let count = stored.max(min);
    if max > 0 {
        count.min(max)
    } else {
        count
    }
}

/// What an expansion produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expansion {
    pub group: String,
    /// Repeats rendered
    pub elements: usize,
    /// Generated data fields, in generation order
    pub data_fields: Vec<String>,
    /// Generated delimiter fields, in generation order
    pub delimiters: Vec<String>,
    /// False when the palette did not contain the group's token
    pub palette_updated: bool,
}

impl Group {
    /// Replace this group's token in `palette_name` with its expanded field
    /// sequence and register every generated definition.
    ///
    /// If the palette does not contain the token the palette is left as is
    /// and `palette_updated` is false. The definitions are registered either
    /// way.
    pub fn expand(
        &self,
        registry: &mut DcaRegistry,
        storage: &dyn ElementCounter,
        palette_name: &str,
    ) -> Result<Expansion> {
        let stored = storage.count_elements(self.table(), self.row_id(), self.name())?;
        let elements = repeat_count(stored, self.min_elements(), self.max_elements());
        let hooks = self.hooks();

        let mut generated: Vec<(String, Definition)> = Vec::new();
        let mut data_fields = Vec::new();
        let mut delimiters = Vec::new();

        let mut push_delimiter = |generated: &mut Vec<(String, Definition)>, d: Delimiter| {
            let name = d.field_name(self.name());
            delimiters.push(name.clone());
            generated.push((name, d.definition(self.name(), &hooks.render)));
        };

        push_delimiter(&mut generated, Delimiter::Start);
        for i in 1..=elements {
            push_delimiter(&mut generated, Delimiter::ElementStart(i));
            for field in self.fields() {
                let name = data_field_name(self.name(), field, i);
                trace!(field = %name, "generated group field");
                data_fields.push(name.clone());
                generated.push((name, self.data_definition(field, hooks)));
            }
            push_delimiter(&mut generated, Delimiter::ElementEnd(i));
        }
        push_delimiter(&mut generated, Delimiter::End);

        let replacement = generated
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let table = registry.table_mut(self.table())?;
        let current = table
            .palette(palette_name)
            .ok_or_else(|| GroupError::PaletteNotFound {
                table: self.table().to_string(),
                palette: palette_name.to_string(),
            })?;

        let palette_updated = match palette::replace_token(current, self.name(), &replacement) {
            Some(expanded) => {
                table.set_palette(palette_name, expanded);
                true
            }
            None => {
                warn!(
                    table = self.table(),
                    palette = palette_name,
                    group = self.name(),
                    "group token not found in palette, leaving it unchanged"
                );
                false
            }
        };

        for (name, def) in generated {
            table.insert_field(name, def);
        }

        debug!(
            table = self.table(),
            row_id = self.row_id(),
            group = self.name(),
            stored,
            elements,
            palette_updated,
            "group expanded"
        );

        Ok(Expansion {
            group: self.name().to_string(),
            elements,
            data_fields,
            delimiters,
            palette_updated,
        })
    }

    /// Definition of one generated instance of `field`.
    fn data_definition(&self, field: &str, hooks: &GroupHooks) -> Definition {
        let mut def = self.field_definition(field).cloned().unwrap_or_default();
        // The group renders the label; sub-fields get none.
        def.insert("label".into(), Value::Null);
        object_entry(&mut def, "eval").insert("doNotSaveEmpty".into(), Value::Bool(true));
        list_entry(&mut def, "load_callback").push(hooks.load.to_value());
        list_entry(&mut def, "save_callback").push(hooks.save.to_value());
        // Values live in the group's composite value, never in own columns.
        def.insert("sql".into(), Value::Null);
        def
    }
}

/// Expand every group field whose token appears in `palette_name`.
pub fn expand_palette(
    registry: &mut DcaRegistry,
    storage: &dyn ElementCounter,
    table: &str,
    row_id: u64,
    palette_name: &str,
    hooks: &GroupHooks,
) -> Result<Vec<Expansion>> {
    let table_config = registry.table(table)?;
    let current = table_config
        .palette(palette_name)
        .ok_or_else(|| GroupError::PaletteNotFound {
            table: table.to_string(),
            palette: palette_name.to_string(),
        })?;
    let groups: Vec<String> = table_config
        .group_fields()
        .into_iter()
        .filter(|name| palette::contains_token(current, name))
        .map(str::to_string)
        .collect();

    // Validate every group before touching the registry.
    let groups = groups
        .iter()
        .map(|name| Ok(Group::new(registry, table, row_id, name)?.with_hooks(hooks.clone())))
        .collect::<Result<Vec<_>>>()?;

    groups
        .iter()
        .map(|group| group.expand(registry, storage, palette_name))
        .collect()
}
