//! # Lexstore - Database-backed string localization
//!
//! Resolves display strings by key and locale from a persistent store.
//!
//! Lexstore provides:
//! - Per-resource, per-locale caching in front of a [`ResourceStore`]
//! - Locale-hierarchy fallback (`zh-CN` -> `zh` -> invariant)
//! - A missing-key short-circuit cache with optional auto-registration
//! - A [`ResolverFactory`] that maps types or base-name/location pairs to
//!   cached [`Resolver`]s
//! - SQLite-backed storage

pub mod locale;
pub mod entry;
pub mod storage;
pub mod cache;
pub mod format;
pub mod resolver;
pub mod naming;
pub mod factory;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use locale::Locale;
pub use entry::{LocaleSet, LocalizedString, ResourceEntry};
pub use storage::{MemoryStore, ResourceStore, SqliteStore};
pub use resolver::{AllStrings, Resolver};
pub use naming::{TypeIdentity, derive_resource_name};
pub use factory::ResolverFactory;
pub use config::{LocalizationOptions, ModuleConfig};

/// Result type alias for Lexstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Lexstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("The manifest resource '{resource}' for the culture '{locale}' is missing")]
    ManifestMissing { resource: String, locale: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for an empty-argument violation
    pub(crate) fn empty(argument: &str) -> Self {
        Error::InvalidArgument(format!("\"{}\" can not be null or empty", argument))
    }

    /// Whether this error came from the store's uniqueness constraint
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::DuplicateEntry(_))
    }
}

/// Fail with [`Error::InvalidArgument`] when `value` is empty
pub(crate) fn require_non_empty(value: &str, argument: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::empty(argument));
    }
    Ok(())
}
