use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key of the "remember me" preference.
pub const REMEMBER_ME: &str = "remember_me";

/// Explicit key-value store for client-persisted preferences, injected
/// instead of accessed ambiently. Single key, single value; no transaction
/// discipline needed.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<bool>;
    fn set(&mut self, key: &str, value: bool) -> Result<()>;
}

/// Non-persistent store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, bool>,
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), value);

        Ok(())
    }
}

/// Preferences persisted as a single JSON object file. Writes go through
/// immediately; a missing file reads as empty.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FilePreferences {
    pub fn open(path: &Path) -> Result<Self> {
        let values = match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("invalid preferences file: {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("error reading preferences: {}", path.display()))
            }
        };

        debug!("loaded {} preference(s) from {}", values.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    fn set(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), Value::Bool(value));

        let raw = serde_json::to_string_pretty(&self.values)?;

        fs::write(&self.path, raw)
            .with_context(|| format!("error writing preferences: {}", self.path.display()))
    }
}
