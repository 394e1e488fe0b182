//! Connection target for the record store.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding [`StoreConfig::data_dir`].
pub const ENV_DATA_DIR: &str = "CONTACTBOOK_DATA_DIR";
/// Environment variable overriding [`StoreConfig::schema`].
pub const ENV_SCHEMA: &str = "CONTACTBOOK_SCHEMA";

const DEFAULT_SCHEMA: &str = "contactbook";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Errors raised while loading a [`StoreConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The schema name is empty or would escape the data directory.
    #[error("invalid schema name {0:?}")]
    InvalidSchema(String),
}

/// Where the contacts database lives.
///
/// Deserialized from camelCase JSON:
/// ```json
/// { "dataDir": "/var/lib/contactbook", "schema": "connect_db", "busyTimeoutMs": 2000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding the database file.
    pub data_dir: PathBuf,
    /// Database name; the file is `<data_dir>/<schema>.db`.
    pub schema: String,
    /// How long a connection waits on a locked database.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            schema: DEFAULT_SCHEMA.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Config rooted at `data_dir` with default schema name and timeout.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON config file. Missing keys take their defaults; unknown
    /// keys are rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Applies `CONTACTBOOK_DATA_DIR` / `CONTACTBOOK_SCHEMA` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_env_from(|key| env::var(key).ok())
    }

    /// Like [`StoreConfig::with_env_overrides`], reading variables through
    /// `lookup`.
    pub fn with_env_from(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.with_overrides(lookup(ENV_DATA_DIR).map(PathBuf::from), lookup(ENV_SCHEMA))
    }

    /// Replaces the data directory and schema where a value is given.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, schema: Option<String>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(schema) = schema {
            self.schema = schema;
        }
        self
    }

    /// Checks that `schema` is a plain file stem inside `data_dir`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let schema = self.schema.as_str();
        let bad = schema.is_empty()
            || schema == "."
            || schema.contains("..")
            || schema.contains(['/', '\\', '\0']);
        if bad {
            return Err(ConfigError::InvalidSchema(self.schema.clone()));
        }
        Ok(())
    }

    /// Full path of the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.db", self.schema))
    }

    /// Busy timeout as a [`Duration`].
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
