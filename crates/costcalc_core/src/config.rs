//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Collect logging, storage and share-link settings in one place.
//! - Overlay `COSTCALC_*` environment variables on build-mode defaults.
//!
//! # Invariants
//! - Unknown variables are ignored; malformed known ones are rejected with
//!   the variable name.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use url::Url;

pub const ENV_LOG_LEVEL: &str = "COSTCALC_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "COSTCALC_LOG_DIR";
pub const ENV_DB_PATH: &str = "COSTCALC_DB_PATH";
pub const ENV_SHARE_URL: &str = "COSTCALC_SHARE_URL";
pub const ENV_STORAGE_QUOTA: &str = "COSTCALC_STORAGE_QUOTA";

const DEFAULT_SHARE_URL: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidUrl { var: &'static str, value: String },
    InvalidNumber { var: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl { var, value } => write!(f, "{var}: `{value}` is not a valid url"),
            Self::InvalidNumber { var, value } => {
                write!(f, "{var}: `{value}` is not a non-negative integer")
            }
        }
    }
}

impl Error for ConfigError {}

/// Core settings resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: String,
    /// Rolling log directory; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// SQLite snapshot file; an in-memory store is used when unset.
    pub db_path: Option<PathBuf>,
    /// Link the share parameters are written onto.
    pub share_base_url: String,
    /// Byte quota for the in-memory store.
    pub storage_quota_bytes: Option<usize>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: None,
            share_base_url: DEFAULT_SHARE_URL.to_string(),
            storage_quota_bytes: None,
        }
    }
}

impl CoreConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overlaid with values from `lookup`; empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level.trim().to_string();
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(raw) = get(ENV_SHARE_URL) {
            let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl {
                var: ENV_SHARE_URL,
                value: raw.clone(),
            })?;
            config.share_base_url = url.into();
        }
        if let Some(raw) = get(ENV_STORAGE_QUOTA) {
            let quota = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: ENV_STORAGE_QUOTA,
                    value: raw.clone(),
                })?;
            config.storage_quota_bytes = Some(quota);
        }

        Ok(config)
    }
}
