//! Command handlers. Each returns the text to print on stdout.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use group_widget::expand::expand_palette;
use group_widget::{DcaRegistry, Group, MemoryStorage, WidgetConfig};
use tracing::info;

use crate::cli::Target;

fn load_registry(target: &Target) -> Result<DcaRegistry> {
    DcaRegistry::load(&target.registry)
        .with_context(|| format!("loading registry {}", target.registry.display()))
}

/// Validate one group and render it as YAML.
pub fn inspect(target: &Target, field: &str) -> Result<String> {
    let registry = load_registry(target)?;
    let group = Group::new(&registry, &target.table, target.row, field)?;
    Ok(serde_yaml_ng::to_string(&group)?)
}

/// Expand one group, or every group in the palette, and render the result.
pub fn expand(
    config: Option<&Path>,
    target: &Target,
    palette: &str,
    field: Option<&str>,
    records: Option<&Path>,
    dump_fields: bool,
) -> Result<String> {
    let config = WidgetConfig::load(config).context("loading widget settings")?;
    let mut registry = load_registry(target)?;
    let storage = match records {
        Some(path) => MemoryStorage::load(path)
            .with_context(|| format!("loading records {}", path.display()))?,
        None => MemoryStorage::new(),
    };

    let expansions = match field {
        Some(name) => {
            let group = Group::new(&registry, &target.table, target.row, name)?
                .with_hooks(config.hooks.clone());
            vec![group.expand(&mut registry, &storage, palette)?]
        }
        None => expand_palette(
            &mut registry,
            &storage,
            &target.table,
            target.row,
            palette,
            &config.hooks,
        )?,
    };

    for expansion in &expansions {
        info!(
            group = %expansion.group,
            elements = expansion.elements,
            palette_updated = expansion.palette_updated,
            "expanded"
        );
    }

    let table = registry.table(&target.table)?;
    let mut out = String::new();
    writeln!(out, "{}", table.palette(palette).unwrap_or_default())?;
    if dump_fields {
        out.push_str(&table.to_yaml()?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const REGISTRY: &str = r#"
tl_foo:
  palettes:
    default: "{some_legend},foobar;my_group"
  fields:
    foo:
      inputType: text
    my_group:
      inputType: group
      label: [My group, Repeated block]
      palette: [foo, bar]
      fields:
        bar: { inputType: random }
      min: 1
      max: 3
"#;

    fn target(dir: &TempDir) -> Target {
        let registry = dir.path().join("dca.yaml");
        std::fs::write(&registry, REGISTRY).unwrap();
        Target {
            registry,
            table: "tl_foo".into(),
            row: 123,
        }
    }

    #[test]
    fn inspect_prints_group() {
        let tmp = TempDir::new().unwrap();
        let output = inspect(&target(&tmp), "my_group").unwrap();
        assert!(output.contains("label: My group"));
        assert!(output.contains("min_elements: 1"));
        assert!(output.contains("storage: serialized"));
    }

    #[test]
    fn inspect_reports_invalid_definition() {
        let tmp = TempDir::new().unwrap();
        let err = inspect(&target(&tmp), "foo").unwrap_err();
        assert!(err.to_string().contains("cannot both be empty"));
    }

    #[test]
    fn expand_with_records() {
        let tmp = TempDir::new().unwrap();
        let records = tmp.path().join("records.yaml");
        std::fs::write(&records, "tl_foo:\n  123:\n    my_group: [{}, {}]\n").unwrap();

        let output = expand(
            None,
            &target(&tmp),
            "default",
            Some("my_group"),
            Some(&records),
            false,
        )
        .unwrap();

        assert!(output.starts_with("{some_legend},foobar;my_group__(start),"));
        assert!(output.contains("my_group__bar__2"));
        assert!(!output.contains("my_group__bar__3"));
        assert!(output.trim_end().ends_with("my_group__(end)"));
    }

    #[test]
    fn expand_all_groups_and_dump_fields() {
        let tmp = TempDir::new().unwrap();
        let output = expand(None, &target(&tmp), "default", None, None, true).unwrap();

        assert!(output.contains("my_group__foo__1"));
        assert!(output.contains("onLoadGroupField"));
        assert!(output.contains("doNotSaveEmpty: true"));
        assert!(output.contains("palettes:"));
    }

    #[test]
    fn expand_missing_registry() {
        let target = Target {
            registry: PathBuf::from("/nonexistent/dca.yaml"),
            table: "tl_foo".into(),
            row: 1,
        };
        let err = expand(None, &target, "default", None, None, false).unwrap_err();
        assert!(format!("{err:#}").contains("loading registry"));
    }
}
