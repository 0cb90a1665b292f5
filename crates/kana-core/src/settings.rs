//! Engine settings loaded from TOML.
//!
//! Defaults are embedded via `include_str!("default_settings.toml")`.
//! Settings are plain values: parse them once and hand them to whatever
//! builds the engine or the session.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::rule::RuleElement;
use crate::table::{builtin_rules, load_rules, Flavor, TableError};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub table: TableSettings,
    pub normalize: NormalizeSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default)]
    pub flavor: Flavor,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeSettings {
    pub input: bool,
    pub target: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub reject_mistyped_keys: bool,
    pub max_input_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("default settings TOML must be valid")
    }
}

impl Settings {
    /// The rule table these settings select.
    pub fn rules(&self) -> Result<Vec<RuleElement>, TableError> {
        match &self.table.path {
            Some(path) => load_rules(path, self.table.flavor),
            None => Ok(builtin_rules(self.table.flavor)),
        }
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

/// Read settings from `path`. A relative `table.path` is resolved against
/// the settings file's directory.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut s = parse_settings_toml(&text)?;
    if let (Some(table), Some(dir)) = (s.table.path.as_mut(), path.parent()) {
        if table.is_relative() {
            *table = dir.join(&*table);
        }
    }
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if s.session.max_input_len == 0 {
        return Err(SettingsError::InvalidValue {
            field: "session.max_input_len".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if s.table.path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
        return Err(SettingsError::InvalidValue {
            field: "table.path".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
