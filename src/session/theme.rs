//! Persisted theme preference.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::Theme;

/// Settings file content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Preferred theme
    pub theme: Theme,
}

/// Reads and writes the theme preference as JSON.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved theme, or `fallback` when nothing is saved.
    ///
    /// A corrupt settings file is logged and treated as missing.
    pub fn load_or(&self, fallback: Theme) -> Theme {
        match self.load() {
            Ok(Some(theme)) => theme,
            Ok(None) => fallback,
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", self.path.display(), e);
                fallback
            }
        }
    }

    /// Load the saved theme.
    pub fn load(&self) -> Result<Option<Theme>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let settings: Settings = serde_json::from_str(&text)
            .map_err(|e| Error::Settings(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(settings.theme))
    }

    /// Save a theme, creating parent directories as needed.
    pub fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&Settings { theme })
            .map_err(|e| Error::Settings(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        log::debug!("Saved theme {} to {}", theme, self.path.display());
        Ok(())
    }

    /// Flip the saved theme and return the new one.
    pub fn toggle(&self, fallback: Theme) -> Result<Theme> {
        let theme = self.load_or(fallback).toggled();
        self.save(theme)?;
        Ok(theme)
    }
}
