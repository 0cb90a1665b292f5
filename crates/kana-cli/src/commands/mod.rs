//! Subcommand implementations for `kanatool`.

use std::path::PathBuf;

use kana_engine::settings::{load_settings, Settings, SettingsError};
use kana_engine::table::TableError;
use kana_engine::{Flavor, SessionOptions, TypingEngine};

pub mod convert_ops;
pub mod rules_ops;
pub mod train_ops;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the engine's table and settings come from.
#[derive(Debug, Clone, Default)]
pub struct EngineSource {
    pub config: Option<PathBuf>,
    /// Overrides `table.path` from the settings.
    pub table: Option<PathBuf>,
    /// Overrides `table.flavor` from the settings.
    pub flavor: Option<Flavor>,
}

impl EngineSource {
    pub fn settings(&self) -> Result<Settings, CommandError> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)?,
            None => Settings::default(),
        };
        if let Some(table) = &self.table {
            settings.table.path = Some(table.clone());
        }
        if let Some(flavor) = self.flavor {
            settings.table.flavor = flavor;
        }
        Ok(settings)
    }

    pub fn open(&self) -> Result<(TypingEngine, SessionOptions), CommandError> {
        let settings = self.settings()?;
        let engine = TypingEngine::from_settings(&settings)?;
        Ok((engine, SessionOptions::from_settings(&settings)))
    }
}
