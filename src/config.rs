//! Static configuration of the group: who is part of it, and where its expenses are kept.
//!
//! It lives in a small JSON file:
//!
//! ```json
//! { "roster": ["Asha", "Ravi", "Kiran"], "store_path": "expenses.json" }
//! ```
//!
//! A relative `store_path` is relative to the directory of the configuration file.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_STORE: &str = "expenses.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    roster: Vec<String>,
    store_path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    roster: Vec<String>,

    #[serde(default)]
    store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster: Vec::new(),
            store_path: PathBuf::from(DEFAULT_STORE),
        }
    }
}

impl Config {
    pub fn new(roster: Vec<String>, store_path: impl Into<PathBuf>) -> Self {
        Self {
            roster,
            store_path: store_path.into(),
        }
    }

    /// Load the configuration file at `path`.
    ///
    /// # Errors
    /// - the file can't be read or isn't valid JSON,
    /// - the roster lists the same name twice, or an empty name.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read the configuration file {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;

        let mut roster: Vec<String> = Vec::with_capacity(file.roster.len());
        for name in file.roster {
            let name = name.trim().to_string();
            if name.is_empty() {
                bail!("The roster in {} contains an empty name", path.display());
            }
            if roster.contains(&name) {
                bail!("{} is listed twice in the roster of {}", name, path.display());
            }
            roster.push(name);
        }

        let store_path = file
            .store_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
        let store_path = match path.parent() {
            Some(dir) if store_path.is_relative() => dir.join(store_path),
            _ => store_path,
        };

        Ok(Self { roster, store_path })
    }

    /// Names allowed to record expenses. Empty means anybody.
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn with_store_path(mut self, store_path: impl Into<PathBuf>) -> Self {
        self.store_path = store_path.into();
        self
    }
}
