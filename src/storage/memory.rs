//! In-memory store, for tests and embedders without a database

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::{Error, Result};
use crate::entry::ResourceEntry;
use super::ResourceStore;

type EntryKey = (String, String, String);

/// A [`ResourceStore`] held in a map, with read/insert counters
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<EntryKey, Option<String>>>,
    reads: AtomicUsize,
    inserts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(resource, locale, key, value)` rows
    pub fn with_entries<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str, &'a str, &'a str)>) -> Self {
        let store = Self::new();
        for (resource, locale, key, value) in rows {
            store.set(&ResourceEntry::new(resource, locale, key, value));
        }
        store
    }

    /// Insert or replace an entry without touching the counters
    pub fn set(&self, entry: &ResourceEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key_of(entry), entry.localized_content.clone());
    }

    /// Look up one entry. `None` when the triple is not stored
    pub fn get(&self, resource_name: &str, locale: &str, content_key: &str) -> Option<ResourceEntry> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let key = (resource_name.to_string(), locale.to_string(), content_key.to_string());
        entries.get(&key).map(|content| ResourceEntry {
            resource_name: resource_name.to_string(),
            locale: locale.to_string(),
            content_key: content_key.to_string(),
            localized_content: content.clone(),
        })
    }

    /// Number of `read_all` calls served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of successful `insert` calls so far
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn key_of(entry: &ResourceEntry) -> EntryKey {
    (
        entry.resource_name.clone(),
        entry.locale.clone(),
        entry.content_key.clone(),
    )
}

impl ResourceStore for MemoryStore {
    fn read_all(&self, resource_name: &str, locale: &str) -> Result<Vec<(String, Option<String>)>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries
            .iter()
            .filter(|((r, l, _), _)| r == resource_name && l == locale)
            .map(|((_, _, k), v)| (k.clone(), v.clone()))
            .collect())
    }

    fn insert(&self, entry: &ResourceEntry) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let key = key_of(entry);
        if entries.contains_key(&key) {
            return Err(Error::DuplicateEntry(format!(
                "{}/{}/{}",
                entry.resource_name, entry.locale, entry.content_key
            )));
        }
        entries.insert(key, entry.localized_content.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
