//! Sync configuration
//!
//! Resolution order, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. `namesync.json` in the project directory
//! 3. `NAMESYNC_*` environment variables
//! 4. Command-line flags (applied by the CLI)

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::state::undo::DEFAULT_MAX_UNDO_LEVELS;

/// Config file name inside the project directory.
pub const CONFIG_FILE: &str = "namesync.json";

/// How Layer→Source propagation treats several selected layers that
/// reference the same source item under different names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// The first layer in selection order names the item; later conflicting
    /// layers are skipped.
    #[default]
    FirstWins,
    /// Every layer renames the item in turn; the last one sticks.
    LastWins,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPolicy::FirstWins => write!(f, "first"),
            ConflictPolicy::LastWins => write!(f, "last"),
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first_wins" => Ok(ConflictPolicy::FirstWins),
            "last" | "last_wins" => Ok(ConflictPolicy::LastWins),
            other => Err(format!("unknown conflict policy '{}'", other)),
        }
    }
}

/// Settings for one sync invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Layer→Source conflict handling.
    pub conflict_policy: ConflictPolicy,

    /// Text between a name and its occurrence number ("Logo.png 2").
    pub suffix_separator: String,

    /// Undo levels kept in the project history.
    pub max_undo_levels: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::default(),
            suffix_separator: " ".to_string(),
            max_undo_levels: DEFAULT_MAX_UNDO_LEVELS,
        }
    }
}

impl SyncConfig {
    /// Load config for a project directory, then apply environment overrides.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let mut config = Self::from_file(&project_dir.join(CONFIG_FILE))?;
        config.apply_env();
        Ok(config)
    }

    /// Read a config file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| SyncError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `NAMESYNC_CONFLICT_POLICY` and `NAMESYNC_SUFFIX_SEPARATOR`.
    pub fn apply_env(&mut self) {
        if let Ok(raw) = env::var("NAMESYNC_CONFLICT_POLICY") {
            match raw.parse() {
                Ok(policy) => self.conflict_policy = policy,
                Err(e) => warn!("Ignoring NAMESYNC_CONFLICT_POLICY: {}", e),
            }
        }
        if let Ok(separator) = env::var("NAMESYNC_SUFFIX_SEPARATOR") {
            self.suffix_separator = separator;
        }
    }
}
