//! Widget settings loaded with figment.
//!
//! Precedence, later overriding earlier:
//! 1. Built-in defaults
//! 2. An optional settings file (`.toml`, `.json`, otherwise YAML)
//! 3. `GROUP_WIDGET_` environment variables, nested with `__`
//!    (`GROUP_WIDGET_HOOKS__LOAD='[svc,onLoad]'`)

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::hooks::GroupHooks;

/// Environment variable prefix for widget settings.
pub const ENV_PREFIX: &str = "GROUP_WIDGET_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Callbacks attached to generated fields
    pub hooks: GroupHooks,
}

impl WidgetConfig {
    /// Load settings from defaults, `path` if given, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(WidgetConfig::default()));

        if let Some(path) = path {
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Yaml::file(path)),
            };
        }

        let config: WidgetConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        debug!(
            load = %config.hooks.load,
            save = %config.hooks.save,
            render = %config.hooks.render,
            "widget config loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Hook;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn defaults_without_sources() {
        let config = WidgetConfig::load(None).unwrap();
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    #[serial]
    fn file_overrides_single_hook() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("widget.yaml");
        std::fs::write(&path, "hooks:\n  save: [app.listener, onSave]\n").unwrap();

        let config = WidgetConfig::load(Some(&path)).unwrap();
        assert_eq!(config.hooks.save, Hook::new("app.listener", "onSave"));
        assert_eq!(config.hooks.load, GroupHooks::default().load);
    }

    #[test]
    #[serial]
    fn toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("widget.toml");
        std::fs::write(&path, "[hooks]\nrender = [\"ui.renderer\", \"draw\"]\n").unwrap();

        let config = WidgetConfig::load(Some(&path)).unwrap();
        assert_eq!(config.hooks.render, Hook::new("ui.renderer", "draw"));
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("widget.yaml");
        std::fs::write(&path, "hooks:\n  load: [file.listener, onLoad]\n").unwrap();

        std::env::set_var("GROUP_WIDGET_HOOKS__LOAD", "[env.listener,onLoad]");
        let result = WidgetConfig::load(Some(&path));
        std::env::remove_var("GROUP_WIDGET_HOOKS__LOAD");

        assert_eq!(result.unwrap().hooks.load, Hook::new("env.listener", "onLoad"));
    }
}
