//! Persistence adapter: durable key/value storage and the shareable link.
//!
//! # Responsibility
//! - Define the two capability interfaces the sync controller writes through.
//! - Provide snapshot encoding plus in-memory, SQLite and URL-backed
//!   implementations.
//!
//! # Invariants
//! - Adapters own no domain data; they only store opaque snapshot strings.
//! - Adapter failures are reported to the caller, which decides whether to
//!   drop them. The sync controller always drops them.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod link;
pub mod memory;
pub mod snapshot;
pub mod sqlite;

pub use link::UrlShareLink;
pub use memory::MemoryDurableStore;
pub use snapshot::{Collection, SnapshotError, EXPENSES_KEY, PEOPLE_KEY};
pub use sqlite::SqliteDurableStore;

pub type DurableResult<T> = Result<T, DurableError>;

/// Durable storage failure.
#[derive(Debug)]
pub enum DurableError {
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },
    Sqlite(rusqlite::Error),
    /// The snapshot file was stamped by a newer build.
    UnsupportedSchemaVersion {
        found: u32,
        supported: u32,
    },
}

impl Display for DurableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                required,
                quota,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required} bytes needed, quota {quota}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "snapshot schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for DurableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DurableError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Shareable link failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// No navigation context is attached.
    Unavailable,
    InvalidUrl(url::ParseError),
}

impl Display for LinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "navigation context unavailable"),
            Self::InvalidUrl(err) => write!(f, "invalid share url: {err}"),
        }
    }
}

impl Error for LinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable => None,
            Self::InvalidUrl(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for LinkError {
    fn from(value: url::ParseError) -> Self {
        Self::InvalidUrl(value)
    }
}

/// Key/value storage that outlives the session, scoped to one origin.
pub trait DurableStore {
    fn load(&self, key: &str) -> DurableResult<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> DurableResult<()>;
    fn remove(&mut self, key: &str) -> DurableResult<()>;
}

/// Query parameters of the current shareable link.
pub trait ShareLink {
    fn read_param(&self, name: &str) -> Option<String>;
    /// Rewrites `name=value` on the current entry without adding history.
    fn write_param(&mut self, name: &str, value: &str) -> Result<(), LinkError>;
}
