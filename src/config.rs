//! Settings file support
//!
//! Highlighter settings live in ~/.loglight.toml (or
//! %USERPROFILE%\.loglight.toml on Windows) unless another path is given.
//!
//! The file is a TOML document; the highlighter collection occupies the
//! `HighlighterSetCollection` table and other top-level keys are preserved
//! when the collection is written back.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use toml::Table;

use crate::error::{HighlightError, Result};
use crate::highlight::RuleSetCollection;
use crate::persist;

const SETTINGS_FILE_NAME: &str = ".loglight.toml";

/// Location of the settings file
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings file path
    pub settings_path: PathBuf,
}

impl Config {
    /// Get the default settings file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(SETTINGS_FILE_NAME))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(SETTINGS_FILE_NAME))
        }
    }

    /// Use the default settings file
    pub fn from_default_location() -> Result<Self> {
        Self::config_path()
            .map(Self::with_path)
            .ok_or(HighlightError::NoConfigPath)
    }

    /// Use an explicit settings file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Read the settings document; a missing file is an empty document
    pub fn read_document(&self) -> Result<Table> {
        match fs::read_to_string(&self.settings_path) {
            Ok(contents) => Ok(contents.parse::<Table>()?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no settings at {}", self.settings_path.display());
                Ok(Table::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the settings file with `doc`
    ///
    /// The document is written next to the target and renamed over it, so a
    /// crash mid-write leaves the previous file intact.
    pub fn write_document(&self, doc: &Table) -> Result<()> {
        let contents = toml::to_string(doc)?;

        if let Some(dir) = self.settings_path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let mut staging = self.settings_path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, contents)?;
        fs::rename(&staging, &self.settings_path)?;
        Ok(())
    }

    /// Load the highlighter collection, persisting any migration
    pub fn load_highlighters(&self) -> Result<RuleSetCollection> {
        let mut doc = self.read_document()?;
        let outcome = persist::load_collection(&mut doc);

        if outcome.migrated {
            log::info!("rewriting migrated settings at {}", self.settings_path.display());
            self.write_document(&doc)?;
        }
        Ok(outcome.collection)
    }

    /// Write the highlighter collection, keeping unrelated settings
    pub fn save_highlighters(&self, collection: &RuleSetCollection) -> Result<()> {
        let mut doc = self.read_document()?;
        persist::save_collection(collection, &mut doc)?;
        self.write_document(&doc)
    }
}
