//! Runtime configuration.
//!
//! # Responsibility
//! - Decide once which backend a workspace is composed with.
//! - Read settings from `LESSONBOOK_*` environment variables.
//!
//! # Invariants
//! - Live mode always carries a database path.
//! - A configured log directory is absolute.
//! - Defaults describe the demo sandbox.

use crate::backend::demo::DEMO_OWNER_ID;
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_BACKEND: &str = "LESSONBOOK_BACKEND";
pub const ENV_DB_PATH: &str = "LESSONBOOK_DB_PATH";
pub const ENV_OWNER_ID: &str = "LESSONBOOK_OWNER_ID";
pub const ENV_LOG_LEVEL: &str = "LESSONBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LESSONBOOK_LOG_DIR";

/// Which adapter every store of a workspace talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendMode {
    /// Seeded in-memory fixture.
    #[default]
    Demo,
    /// SQLite database at [`CoreConfig::db_path`].
    Live,
}

impl BackendMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Live => "live",
        }
    }
}

impl FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "demo" | "sandbox" => Ok(Self::Demo),
            "live" | "sqlite" => Ok(Self::Live),
            other => Err(ConfigError::InvalidValue {
                key: ENV_BACKEND,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
    MissingValue(&'static str),
    /// Path setting is not absolute.
    RelativePath { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
            Self::MissingValue(key) => write!(f, "{key} is required"),
            Self::RelativePath { key, value } => {
                write!(f, "{key} must be an absolute path, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub backend: BackendMode,
    pub db_path: Option<PathBuf>,
    pub owner_id: String,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendMode::Demo,
            db_path: None,
            owner_id: DEMO_OWNER_ID.to_string(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`, which maps a variable name to its
    /// value. Blank values count as unset.
    ///
    /// # Errors
    /// - `InvalidValue` for an unknown backend mode or log level.
    /// - `MissingValue` when live mode has no database path.
    /// - `RelativePath` when the log directory is not absolute.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(value) = read(ENV_BACKEND) {
            config.backend = value.parse()?;
        }
        config.db_path = read(ENV_DB_PATH).map(PathBuf::from);
        if let Some(owner_id) = read(ENV_OWNER_ID) {
            config.owner_id = owner_id;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level =
                normalize_level(&level).map_err(|_| ConfigError::InvalidValue {
                    key: ENV_LOG_LEVEL,
                    value: level.clone(),
                })?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            let path = PathBuf::from(&dir);
            if !path.is_absolute() {
                return Err(ConfigError::RelativePath {
                    key: ENV_LOG_DIR,
                    value: dir,
                });
            }
            config.log_dir = Some(path);
        }

        if config.backend == BackendMode::Live && config.db_path.is_none() {
            return Err(ConfigError::MissingValue(ENV_DB_PATH));
        }
        Ok(config)
    }
}
