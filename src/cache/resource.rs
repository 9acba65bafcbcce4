//! Per-locale resource sets with hierarchy fallback
//!
//! Sets are loaded lazily from the store and kept until invalidated. Loading
//! is not exclusive: two threads missing on the same pair may both read the
//! store, and the later write wins. Both writes hold the same snapshot.

use std::sync::Arc;
use dashmap::DashMap;
use crate::Result;
use crate::entry::LocaleSet;
use crate::locale::Locale;
use crate::storage::ResourceStore;
use super::locale_set_key;

/// Locale sets of every resource served by one factory
pub struct ResourceCache<S> {
    store: Arc<S>,
    sets: DashMap<String, Arc<LocaleSet>>,
}

impl<S: ResourceStore> ResourceCache<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sets: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Read the exact pair from the store unless it is already cached.
    ///
    /// An empty result is cached too; it means "loaded, nothing stored".
    pub fn load(&self, resource_name: &str, locale: &Locale) -> Result<()> {
        let key = locale_set_key(resource_name, locale);
        if self.sets.contains_key(&key) {
            return Ok(());
        }

        let pairs = self.store.read_all(resource_name, locale.name())?;
        tracing::trace!(
            resource = resource_name,
            locale = %locale,
            entries = pairs.len(),
            "Loaded locale set"
        );

        let set: LocaleSet = pairs.into_iter().collect();
        self.sets.insert(key, Arc::new(set));
        Ok(())
    }

    /// Get the set for `locale`.
    ///
    /// Without ancestors, this is the exact-locale set, or `None` when the pair
    /// is not cached. With ancestors, the sets along the chain up to the
    /// invariant locale are merged, more specific locales winning; the result
    /// is never `None`.
    pub fn get(&self, resource_name: &str, locale: &Locale, include_ancestors: bool) -> Result<Option<Arc<LocaleSet>>> {
        if include_ancestors {
            return self.merged(resource_name, locale).map(|set| Some(Arc::new(set)));
        }

        self.load(resource_name, locale)?;
        Ok(self.cached(resource_name, locale))
    }

    /// Merge the chain from `locale` to the root, first writer wins
    pub fn merged(&self, resource_name: &str, locale: &Locale) -> Result<LocaleSet> {
        let mut merged = LocaleSet::new();
        for current in locale.chain() {
            self.load(resource_name, &current)?;
            if let Some(set) = self.cached(resource_name, &current) {
                for (key, value) in set.iter() {
                    merged.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }
        Ok(merged)
    }

    /// Find one key along the chain without materializing the merged set.
    ///
    /// Returns the entry of the most specific locale that has the key (its
    /// content may still be `None`), loading ancestors only as far as needed.
    pub fn lookup(&self, resource_name: &str, locale: &Locale, key: &str) -> Result<Option<Option<String>>> {
        for current in locale.chain() {
            self.load(resource_name, &current)?;
            if let Some(value) = self.cached(resource_name, &current).and_then(|set| set.get(key).cloned()) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Drop the exact pair. Ancestors and descendants are untouched.
    pub fn invalidate(&self, resource_name: &str, locale: &Locale) {
        let key = locale_set_key(resource_name, locale);
        if self.sets.remove(&key).is_some() {
            tracing::debug!(resource = resource_name, locale = %locale, "Invalidated locale set");
        }
    }

    pub fn is_loaded(&self, resource_name: &str, locale: &Locale) -> bool {
        self.sets.contains_key(&locale_set_key(resource_name, locale))
    }

    fn cached(&self, resource_name: &str, locale: &Locale) -> Option<Arc<LocaleSet>> {
        self.sets
            .get(&locale_set_key(resource_name, locale))
            .map(|set| Arc::clone(set.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ResourceEntry;
    use crate::storage::MemoryStore;

    fn locale(name: &str) -> Locale {
        Locale::new(name).unwrap()
    }

    fn sample_cache() -> ResourceCache<MemoryStore> {
        let store = MemoryStore::with_entries([
            ("App.Strings", "zh-CN", "A", "甲-CN"),
            ("App.Strings", "zh", "A", "甲"),
            ("App.Strings", "zh", "B", "乙"),
            ("App.Strings", "", "C", "default"),
        ]);
        ResourceCache::new(Arc::new(store))
    }

    #[test]
    fn test_exact_get_loads_once() {
        let cache = sample_cache();

        let set = cache.get("App.Strings", &locale("zh"), false).unwrap().unwrap();
        assert_eq!(set.len(), 2);
        cache.get("App.Strings", &locale("zh"), false).unwrap();
        assert_eq!(cache.store().reads(), 1);
    }

    #[test]
    fn test_empty_set_is_loaded() {
        let cache = sample_cache();

        let set = cache.get("Unknown", &locale("fr"), false).unwrap().unwrap();
        assert!(set.is_empty());
        assert!(cache.is_loaded("Unknown", &locale("fr")));
    }

    #[test]
    fn test_merge_more_specific_wins() {
        let cache = sample_cache();

        let merged = cache.get("App.Strings", &locale("zh-CN"), true).unwrap().unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged["A"].as_deref(), Some("甲-CN"));
        assert_eq!(merged["B"].as_deref(), Some("乙"));
        assert_eq!(merged["C"].as_deref(), Some("default"));
    }

    #[test]
    fn test_merge_unknown_resource_is_empty() {
        let cache = sample_cache();
        let merged = cache.get("Nope", &locale("zh-CN"), true).unwrap().unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_lookup_agrees_with_merge() {
        let cache = sample_cache();
        let merged = cache.merged("App.Strings", &locale("zh-CN")).unwrap();

        for key in ["A", "B", "C", "D"] {
            assert_eq!(
                cache.lookup("App.Strings", &locale("zh-CN"), key).unwrap(),
                merged.get(key).cloned()
            );
        }
    }

    #[test]
    fn test_lookup_stops_at_first_match() {
        let cache = sample_cache();

        cache.lookup("App.Strings", &locale("zh-CN"), "A").unwrap();
        assert_eq!(cache.store().reads(), 1);
        assert!(!cache.is_loaded("App.Strings", &locale("zh")));
    }

    #[test]
    fn test_invalidate_exact_pair_only() {
        let cache = sample_cache();
        cache.merged("App.Strings", &locale("zh-CN")).unwrap();
        assert_eq!(cache.store().reads(), 3);

        cache.store().set(&ResourceEntry::new("App.Strings", "zh-CN", "B", "乙-CN"));
        cache.invalidate("App.Strings", &locale("zh-CN"));
        assert!(cache.is_loaded("App.Strings", &locale("zh")));

        let merged = cache.merged("App.Strings", &locale("zh-CN")).unwrap();
        assert_eq!(merged["B"].as_deref(), Some("乙-CN"));
        assert_eq!(cache.store().reads(), 4);
    }
}
