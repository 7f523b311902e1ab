use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::engine::EngineOptions;
use crate::error::SelectionError;
use crate::keymap::PrimaryKey;

use super::mode::{Granularity, SelectionMode};

const DEFAULTS: &str = include_str!("../../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub demo: DemoConfig,
    pub keys: KeysConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub mode: SelectionMode,
    pub granularity: Granularity,
    pub history_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    pub rows: usize,
    pub columns: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeysConfig {
    pub primary: PrimaryKey,
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        match directories::ProjectDirs::from("", "", "selgrid") {
            Some(dirs) => Self::load_from(&dirs.config_dir().join("config.toml")),
            None => Self::defaults(),
        }
    }

    pub fn defaults() -> Result<Self> {
        let config: AppConfig = toml::from_str(DEFAULTS).context("parsing built-in defaults")?;
        Ok(config)
    }

    /// Defaults overlaid with `path`, if it exists. Keys missing from the
    /// user file keep their default value.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut merged: toml::Table = toml::from_str(DEFAULTS)?;
        if path.exists() {
            let user_str = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let user: toml::Table = toml::from_str(&user_str)
                .with_context(|| format!("parsing {}", path.display()))?;
            merge(&mut merged, user);
            tracing::info!(path = %path.display(), "user config loaded");
        }
        let config: AppConfig = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), SelectionError> {
        self.engine.options()?;
        if self.demo.rows == 0 || self.demo.columns == 0 {
            return Err(SelectionError::InvalidConfig(
                "demo needs at least one row and one column".into(),
            ));
        }
        Ok(())
    }
}

impl EngineConfig {
    pub fn options(&self) -> std::result::Result<EngineOptions, SelectionError> {
        // Backtracking compares against the second newest entry.
        if self.history_limit < 2 {
            return Err(SelectionError::InvalidConfig(format!(
                "history_limit must be at least 2, got {}",
                self.history_limit
            )));
        }
        Ok(EngineOptions {
            mode: self.mode,
            granularity: self.granularity,
            history_limit: self.history_limit,
        })
    }
}

/// Recursively overlay `overlay` onto `base`.
fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(table)) => {
                merge(base_table, table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_parse() {
        let config = AppConfig::defaults().unwrap();
        assert_eq!(config.engine.mode, SelectionMode::Multiple);
        assert_eq!(config.engine.granularity, Granularity::Row);
        assert_eq!(config.engine.history_limit, 10);
        assert_eq!(config.keys.primary, PrimaryKey::Ctrl);
    }

    #[test]
    fn missing_user_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.demo.rows, 40);
    }

    #[test]
    fn user_file_overrides_single_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\ngranularity = \"cell\"\n[keys]\nprimary = \"alt\"").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.engine.granularity, Granularity::Cell);
        assert_eq!(config.engine.mode, SelectionMode::Multiple);
        assert_eq!(config.keys.primary, PrimaryKey::Alt);
        assert_eq!(config.demo.columns, 5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nhistory_limit = 1").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("history_limit"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nmode = \"several\"").unwrap();
        assert!(AppConfig::load_from(file.path()).is_err());
    }
}
