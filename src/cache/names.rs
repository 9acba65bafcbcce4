//! Known content keys per `(resource, locale)`, for enumeration

use std::sync::Arc;
use dashmap::DashMap;
use crate::{Error, Result};
use crate::entry::LocaleSet;
use crate::locale::Locale;
use crate::storage::ResourceStore;
use super::{ResourceCache, locale_set_key};

/// Sorted key lists, shared by all resolvers of one factory
#[derive(Default)]
pub struct NameListCache {
    names: DashMap<String, Arc<Vec<String>>>,
}

impl NameListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys stored for the exact `(resource, locale)` pair.
    ///
    /// The pair is loaded first, so it is only missing when an invalidation
    /// lands between that load and the read. Then this fails with
    /// [`Error::ManifestMissing`] if `strict`, otherwise returns `None`.
    /// Only successful lists are cached.
    pub fn names<S: ResourceStore>(
        &self,
        cache: &ResourceCache<S>,
        resource_name: &str,
        locale: &Locale,
        strict: bool,
    ) -> Result<Option<Arc<Vec<String>>>> {
        if let Some(names) = self.names.get(&locale_set_key(resource_name, locale)) {
            return Ok(Some(Arc::clone(names.value())));
        }

        let set = cache.get(resource_name, locale, false)?;
        self.list(resource_name, locale, set, strict)
    }

    fn list(
        &self,
        resource_name: &str,
        locale: &Locale,
        set: Option<Arc<LocaleSet>>,
        strict: bool,
    ) -> Result<Option<Arc<Vec<String>>>> {
        let key = locale_set_key(resource_name, locale);
        match set {
            Some(set) => {
                let mut keys: Vec<String> = set.keys().cloned().collect();
                keys.sort();
                let keys = Arc::new(keys);
                self.names.insert(key, Arc::clone(&keys));
                Ok(Some(keys))
            }
            None if strict => Err(Error::ManifestMissing {
                resource: resource_name.to_string(),
                locale: locale.name().to_string(),
            }),
            None => Ok(None),
        }
    }

    pub fn invalidate(&self, resource_name: &str, locale: &Locale) {
        self.names.remove(&locale_set_key(resource_name, locale));
    }
}
