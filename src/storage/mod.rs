//! Storage Layer - persistence for localization records
//!
//! System of record is a single table:
//! - localization_records(resource_name, resource_culture, content_key, localized_content)
//!
//! with a uniqueness constraint on `(resource_name, resource_culture, content_key)`.
//! The resolution engine only consumes the two operations of [`ResourceStore`].

pub mod schema;
pub mod sqlite;
pub mod memory;

pub use sqlite::{SqliteStore, StoreStats};
pub use memory::MemoryStore;

use crate::Result;
use crate::entry::ResourceEntry;
use std::sync::Arc;

/// The backing store consulted on cache misses.
pub trait ResourceStore: Send + Sync {
    /// Read every `(content_key, localized_content)` pair for the exact
    /// `(resource_name, locale)` pair. Ancestor locales are not included.
    /// Returns an empty vector when nothing is stored.
    fn read_all(&self, resource_name: &str, locale: &str) -> Result<Vec<(String, Option<String>)>>;

    /// Insert a new entry. A duplicate `(resource_name, locale, content_key)`
    /// triple must be rejected with [`crate::Error::DuplicateEntry`].
    fn insert(&self, entry: &ResourceEntry) -> Result<()>;
}

impl<S: ResourceStore + ?Sized> ResourceStore for Arc<S> {
    fn read_all(&self, resource_name: &str, locale: &str) -> Result<Vec<(String, Option<String>)>> {
        (**self).read_all(resource_name, locale)
    }

    fn insert(&self, entry: &ResourceEntry) -> Result<()> {
        (**self).insert(entry)
    }
}
