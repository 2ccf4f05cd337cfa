//! Storage configuration (connection pragmas, signature scheme)
//!
//! Loaded from YAML or defaulted:
//!
//! ```yaml
//! cache_size: 10000
//! synchronous: normal
//! journal_mode: wal
//! foreign_keys: true
//! busy_timeout_ms: 5000
//! signature_scheme: concatenated
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::query::SignatureScheme;
use crate::{QueryError, Result};

/// `PRAGMA synchronous` levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Synchronous {
    Off,
    Normal,
    Full,
    Extra,
}

impl Synchronous {
    pub fn as_str(&self) -> &'static str {
        match self {
            Synchronous::Off => "OFF",
            Synchronous::Normal => "NORMAL",
            Synchronous::Full => "FULL",
            Synchronous::Extra => "EXTRA",
        }
    }
}

/// `PRAGMA journal_mode` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

impl JournalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Memory => "MEMORY",
            JournalMode::Wal => "WAL",
            JournalMode::Off => "OFF",
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Page cache size (`PRAGMA cache_size`); larger helps heavy read loads
    pub cache_size: i64,

    pub synchronous: Synchronous,

    /// WAL lets external writers proceed while we read
    pub journal_mode: JournalMode,

    pub foreign_keys: bool,

    /// How long to wait on a locked database before failing
    pub busy_timeout_ms: u64,

    pub signature_scheme: SignatureScheme,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_size: 10_000,
            synchronous: Synchronous::Normal,
            journal_mode: JournalMode::Wal,
            foreign_keys: true,
            busy_timeout_ms: 5_000,
            signature_scheme: SignatureScheme::Concatenated,
        }
    }
}

impl StorageConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: StorageConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_size == 0 {
            return Err(QueryError::config(
                "cache_size must be non-zero (positive = pages, negative = KiB)",
            ));
        }
        if self.busy_timeout_ms > 600_000 {
            return Err(QueryError::config(format!(
                "busy_timeout_ms {} exceeds 600000",
                self.busy_timeout_ms
            )));
        }
        Ok(())
    }
}
