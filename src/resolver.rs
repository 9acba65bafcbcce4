//! String Resolver
//!
//! The lookup façade for one resource name. Resolution order for a key:
//! 1. Known-missing cache (no store access)
//! 2. Exact locale, then each ancestor up to the invariant locale
//! 3. Fallback to the key itself, optionally registering it in the store
//!
//! A missing translation never surfaces as an error; it degrades to the key.

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;
use dashmap::DashMap;
use crate::{Result, require_non_empty};
use crate::cache::{NameListCache, ResourceCache};
use crate::entry::{LocalizedString, ResourceEntry};
use crate::format::format_positional;
use crate::locale::Locale;
use crate::storage::ResourceStore;

/// Where every lookup is reported as having searched
const SEARCHED_LOCATION: &str = "database";

/// Key of the known-missing cache
pub fn missing_key(key: &str, locale: &Locale) -> String {
    format!("name={}&culture={}", key, locale.name())
}

/// Resolves strings of one resource name
pub struct Resolver<S> {
    resource_name: String,
    cache: Arc<ResourceCache<S>>,
    names: Arc<NameListCache>,
    /// missing key -> the locale it was missed in
    missing: DashMap<String, Locale>,
    auto_create_missing: bool,
}

impl<S: ResourceStore> Resolver<S> {
    /// Create a resolver over shared caches
    pub fn new(
        resource_name: impl Into<String>,
        cache: Arc<ResourceCache<S>>,
        names: Arc<NameListCache>,
        auto_create_missing: bool,
    ) -> Result<Self> {
        let resource_name = resource_name.into();
        require_non_empty(&resource_name, "resource_name")?;

        Ok(Self {
            resource_name,
            cache,
            names,
            missing: DashMap::new(),
            auto_create_missing,
        })
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Resolve `key` to its display value, or the key itself when missing
    pub fn resolve(&self, key: &str, locale: &Locale) -> Result<String> {
        self.lookup(key, locale).map(|s| s.value)
    }

    /// Resolve `key` and substitute positional arguments
    pub fn resolve_formatted<T: Display>(&self, key: &str, args: &[T], locale: &Locale) -> Result<String> {
        self.lookup_formatted(key, args, locale).map(|s| s.value)
    }

    /// Resolve `key`, reporting whether a translation was found
    pub fn lookup(&self, key: &str, locale: &Locale) -> Result<LocalizedString> {
        let value = self.find(key, locale)?;
        let found = value.is_some();
        Ok(LocalizedString::new(key, value.unwrap_or_else(|| key.to_string()), found))
    }

    /// [`Resolver::lookup`] with positional arguments applied to the template
    pub fn lookup_formatted<T: Display>(&self, key: &str, args: &[T], locale: &Locale) -> Result<LocalizedString> {
        let template = self.find(key, locale)?;
        let found = template.is_some();
        let value = format_positional(template.as_deref().unwrap_or(key), args);
        Ok(LocalizedString::new(key, value, found))
    }

    /// Enumerate strings for `locale`.
    ///
    /// Without ancestors, the exact locale must be known or this fails with
    /// [`crate::Error::ManifestMissing`]; since the pair is loaded first, that
    /// only happens when a concurrent invalidate drops it. With ancestors,
    /// keys are the deduplicated union along the locale chain, most specific
    /// first.
    pub fn all_strings(&self, locale: &Locale, include_ancestors: bool) -> Result<AllStrings<'_, S>> {
        let keys = if include_ancestors {
            self.names_in_hierarchy(locale)?
        } else {
            self.names
                .names(self.cache.as_ref(), &self.resource_name, locale, true)?
                .map(|names| names.to_vec())
                .unwrap_or_default()
        };

        Ok(AllStrings {
            resolver: self,
            locale: locale.clone(),
            keys,
        })
    }

    /// Drop the cached set for the exact locale, its key list, and any
    /// known-missing keys whose lookup went through that locale.
    pub fn invalidate(&self, locale: &Locale) {
        self.cache.invalidate(&self.resource_name, locale);
        self.names.invalidate(&self.resource_name, locale);
        self.missing
            .retain(|_, missed_in| !missed_in.chain().any(|ancestor| ancestor == *locale));
    }

    /// Whether `(key, locale)` is currently short-circuited as missing
    pub fn is_known_missing(&self, key: &str, locale: &Locale) -> bool {
        self.missing.contains_key(&missing_key(key, locale))
    }

    fn find(&self, key: &str, locale: &Locale) -> Result<Option<String>> {
        require_non_empty(key, "key")?;

        tracing::debug!(
            key,
            location = SEARCHED_LOCATION,
            locale = %locale,
            "Resolver searched for '{}' in '{}' with culture '{}'",
            key,
            SEARCHED_LOCATION,
            locale
        );

        let cache_key = missing_key(key, locale);
        if self.missing.contains_key(&cache_key) {
            return Ok(None);
        }

        match self.cache.lookup(&self.resource_name, locale, key)? {
            Some(Some(value)) if !value.is_empty() => Ok(Some(value)),
            _ => {
                self.missing.insert(cache_key, locale.clone());
                if self.auto_create_missing {
                    self.register_missing(key, locale);
                }
                Ok(None)
            }
        }
    }

    /// Best-effort insert of an untranslated entry; failures are dropped
    fn register_missing(&self, key: &str, locale: &Locale) {
        let entry = ResourceEntry::placeholder(self.resource_name.as_str(), locale.name(), key);
        match self.cache.store().insert(&entry) {
            Ok(()) => tracing::debug!(
                resource = %self.resource_name,
                locale = %locale,
                key,
                "Registered missing resource string"
            ),
            Err(e) => tracing::debug!(
                resource = %self.resource_name,
                locale = %locale,
                key,
                "Could not register missing resource string: {}",
                e
            ),
        }
    }

    fn names_in_hierarchy(&self, locale: &Locale) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();

        for current in locale.chain() {
            if let Some(names) = self.names.names(self.cache.as_ref(), &self.resource_name, &current, false)? {
                for name in names.iter() {
                    if seen.insert(name.clone()) {
                        keys.push(name.clone());
                    }
                }
            }
        }

        Ok(keys)
    }
}

/// The strings of one resource and locale.
///
/// Keys are fixed when this is created; values are resolved as the sequence
/// is iterated, and it can be iterated any number of times.
pub struct AllStrings<'a, S> {
    resolver: &'a Resolver<S>,
    locale: Locale,
    keys: Vec<String>,
}

impl<'a, S: ResourceStore> AllStrings<'a, S> {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<LocalizedString>> + '_ {
        self.keys
            .iter()
            .map(move |key| self.resolver.lookup(key, &self.locale))
    }
}

impl<'s, 'a, S: ResourceStore> IntoIterator for &'s AllStrings<'a, S> {
    type Item = Result<LocalizedString>;
    type IntoIter = Box<dyn Iterator<Item = Result<LocalizedString>> + 's>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::storage::{MemoryStore, SqliteStore};

    fn locale(name: &str) -> Locale {
        Locale::new(name).unwrap()
    }

    fn resolver_over<S: ResourceStore>(store: S, auto_create: bool) -> Resolver<S> {
        let cache = Arc::new(ResourceCache::new(Arc::new(store)));
        Resolver::new("App.Strings", cache, Arc::new(NameListCache::new()), auto_create).unwrap()
    }

    fn store(resolver: &Resolver<MemoryStore>) -> &MemoryStore {
        resolver.cache.store()
    }

    #[test]
    fn test_parent_fallback() {
        let resolver = resolver_over(MemoryStore::with_entries([("App.Strings", "zh", "Hello", "你好")]), false);
        assert_eq!(resolver.resolve("Hello", &locale("zh-CN")).unwrap(), "你好");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let resolver = resolver_over(MemoryStore::with_entries([("App.Strings", "zh", "Hello", "你好")]), false);

        let result = resolver.lookup("Bye", &locale("zh-CN")).unwrap();
        assert_eq!(result.value, "Bye");
        assert!(!result.found);
        assert_eq!(store(&resolver).inserts(), 0);
    }

    #[test]
    fn test_auto_create_registers_exact_locale() {
        let resolver = resolver_over(MemoryStore::with_entries([("App.Strings", "zh", "Hello", "你好")]), true);

        assert_eq!(resolver.resolve("Bye", &locale("zh-CN")).unwrap(), "Bye");
        assert_eq!(
            store(&resolver).get("App.Strings", "zh-CN", "Bye"),
            Some(ResourceEntry::placeholder("App.Strings", "zh-CN", "Bye"))
        );
    }

    #[test]
    fn test_auto_create_duplicate_is_swallowed() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&ResourceEntry::placeholder("App.Strings", "fr", "Title")).unwrap();
        let resolver = resolver_over(store, true);

        // Registered but untranslated: a miss whose insert hits the unique index
        assert_eq!(resolver.resolve("Title", &locale("fr")).unwrap(), "Title");
        assert_eq!(resolver.cache.store().count_entries().unwrap(), 1);
    }

    #[test]
    fn test_more_specific_locale_wins() {
        let resolver = resolver_over(
            MemoryStore::with_entries([
                ("App.Strings", "pt-BR", "Bus", "Ônibus"),
                ("App.Strings", "pt", "Bus", "Autocarro"),
            ]),
            false,
        );

        assert_eq!(resolver.resolve("Bus", &locale("pt-BR")).unwrap(), "Ônibus");
        assert_eq!(resolver.resolve("Bus", &locale("pt-PT")).unwrap(), "Autocarro");
    }

    #[test]
    fn test_empty_content_is_untranslated() {
        let store = MemoryStore::with_entries([("App.Strings", "zh", "Save", "保存")]);
        store.set(&ResourceEntry::new("App.Strings", "zh-CN", "Save", ""));
        let resolver = resolver_over(store, false);

        let result = resolver.lookup("Save", &locale("zh-CN")).unwrap();
        assert_eq!(result.value, "Save");
        assert!(!result.found);
    }

    #[test]
    fn test_repeat_resolve_does_not_reread() {
        let resolver = resolver_over(MemoryStore::with_entries([("App.Strings", "en", "Hi", "Hello")]), false);
        let en = locale("en");

        assert_eq!(resolver.resolve("Hi", &en).unwrap(), "Hello");
        let reads = store(&resolver).reads();
        assert_eq!(resolver.resolve("Hi", &en).unwrap(), "Hello");
        assert_eq!(store(&resolver).reads(), reads);
    }

    #[test]
    fn test_known_missing_short_circuits() {
        let resolver = resolver_over(MemoryStore::new(), true);
        let en = locale("en");

        resolver.resolve("Gone", &en).unwrap();
        assert!(resolver.is_known_missing("Gone", &en));
        let reads = store(&resolver).reads();

        resolver.resolve("Gone", &en).unwrap();
        assert_eq!(store(&resolver).reads(), reads);
        assert_eq!(store(&resolver).inserts(), 1);
    }

    #[test]
    fn test_invalidate_rereads_store() {
        let resolver = resolver_over(MemoryStore::with_entries([("App.Strings", "en", "Hi", "Hello")]), false);
        let en = locale("en");

        resolver.resolve("Hi", &en).unwrap();
        let reads = store(&resolver).reads();

        resolver.invalidate(&en);
        assert_eq!(resolver.resolve("Hi", &en).unwrap(), "Hello");
        assert_eq!(store(&resolver).reads(), reads + 1);
    }

    #[test]
    fn test_invalidate_clears_stale_missing_keys() {
        let resolver = resolver_over(MemoryStore::new(), false);
        let zh_cn = locale("zh-CN");

        assert_eq!(resolver.resolve("Hello", &zh_cn).unwrap(), "Hello");
        store(&resolver).set(&ResourceEntry::new("App.Strings", "zh", "Hello", "你好"));

        // Invalidating the ancestor also releases misses recorded below it
        resolver.invalidate(&locale("zh"));
        assert!(!resolver.is_known_missing("Hello", &zh_cn));
        assert_eq!(resolver.resolve("Hello", &zh_cn).unwrap(), "你好");
    }

    #[test]
    fn test_invalidate_keeps_unrelated_missing_keys() {
        let resolver = resolver_over(MemoryStore::new(), false);

        resolver.resolve("Hello", &locale("fr")).unwrap();
        resolver.invalidate(&locale("de"));
        assert!(resolver.is_known_missing("Hello", &locale("fr")));
    }

    #[test]
    fn test_formatted() {
        let resolver = resolver_over(MemoryStore::with_entries([("App.Strings", "en", "Welcome", "Welcome, {0}!")]), false);
        let en = locale("en");

        assert_eq!(resolver.resolve_formatted("Welcome", &["Ann"], &en).unwrap(), "Welcome, Ann!");

        let fallback = resolver.lookup_formatted("{0} items", &[3], &en).unwrap();
        assert_eq!(fallback.value, "3 items");
        assert!(!fallback.found);
    }

    #[test]
    fn test_all_strings_with_ancestors() {
        let resolver = resolver_over(
            MemoryStore::with_entries([
                ("App.Strings", "zh-CN", "A", "甲-CN"),
                ("App.Strings", "zh", "A", "甲"),
                ("App.Strings", "zh", "B", "乙"),
            ]),
            false,
        );

        let strings = resolver.all_strings(&locale("zh-CN"), true).unwrap();
        assert_eq!(strings.keys(), ["A".to_string(), "B".to_string()]);

        let resolved: Vec<LocalizedString> = strings.iter().collect::<Result<_>>().unwrap();
        assert_eq!(resolved[0], LocalizedString::new("A", "甲-CN", true));
        assert_eq!(resolved[1], LocalizedString::new("B", "乙", true));

        // Restartable
        assert_eq!((&strings).into_iter().count(), 2);
    }

    #[test]
    fn test_all_strings_exact_locale_reports_untranslated() {
        let store = MemoryStore::with_entries([("App.Strings", "en", "Hi", "Hello")]);
        store.set(&ResourceEntry::placeholder("App.Strings", "en", "Later"));
        let resolver = resolver_over(store, false);

        let strings = resolver.all_strings(&locale("en"), false).unwrap();
        let resolved: Vec<LocalizedString> = strings.iter().collect::<Result<_>>().unwrap();
        assert_eq!(
            resolved,
            vec![
                LocalizedString::new("Hi", "Hello", true),
                LocalizedString::new("Later", "Later", false),
            ]
        );
    }

    #[test]
    fn test_all_strings_unknown_locale_is_empty() {
        let resolver = resolver_over(MemoryStore::new(), false);
        assert!(resolver.all_strings(&locale("fr"), false).unwrap().is_empty());
        assert!(resolver.all_strings(&locale("fr"), true).unwrap().is_empty());
    }

    #[test]
    fn test_empty_key_rejected() {
        let resolver = resolver_over(MemoryStore::new(), false);
        assert!(matches!(resolver.resolve("", &locale("en")), Err(Error::InvalidArgument(_))));
        assert_eq!(store(&resolver).reads(), 0);
    }

    #[test]
    fn test_empty_resource_name_rejected() {
        let cache = Arc::new(ResourceCache::new(Arc::new(MemoryStore::new())));
        let result = Resolver::new("", cache, Arc::new(NameListCache::new()), false);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    /// Fields of every debug event emitted while a closure runs
    #[derive(Clone, Default)]
    struct DebugEvents(Arc<std::sync::Mutex<Vec<std::collections::BTreeMap<String, String>>>>);

    struct FieldRecorder<'a>(&'a mut std::collections::BTreeMap<String, String>);

    impl tracing::field::Visit for FieldRecorder<'_> {
        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0.insert(field.name().to_string(), format!("{:?}", value));
        }
    }

    impl<T: tracing::Subscriber> tracing_subscriber::Layer<T> for DebugEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, T>) {
            if *event.metadata().level() != tracing::Level::DEBUG {
                return;
            }
            let mut fields = std::collections::BTreeMap::new();
            event.record(&mut FieldRecorder(&mut fields));
            self.0.lock().unwrap().push(fields);
        }
    }

    impl DebugEvents {
        fn capture(&self, run: impl FnOnce()) {
            use tracing_subscriber::layer::SubscriberExt;
            let subscriber = tracing_subscriber::registry().with(self.clone());
            tracing::subscriber::with_default(subscriber, run);
        }

        fn lookups(&self) -> Vec<std::collections::BTreeMap<String, String>> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|fields| fields.contains_key("location"))
                .cloned()
                .collect()
        }
    }

    #[test]
    fn test_every_lookup_reports_where_it_searched() {
        let resolver = resolver_over(MemoryStore::with_entries([("App.Strings", "zh", "Hello", "你好")]), false);
        let zh_cn = locale("zh-CN");
        let events = DebugEvents::default();

        events.capture(|| {
            assert_eq!(resolver.resolve("Hello", &zh_cn).unwrap(), "你好");
            assert_eq!(resolver.resolve("Bye", &zh_cn).unwrap(), "Bye");
            // Short-circuited by the known-missing cache, still reported
            assert_eq!(resolver.resolve("Bye", &zh_cn).unwrap(), "Bye");
        });

        let lookups = events.lookups();
        assert_eq!(lookups.len(), 3);
        assert_eq!(lookups[0]["key"], "Hello");
        assert_eq!(lookups[0]["location"], "database");
        assert_eq!(lookups[0]["locale"], "zh-CN");
        assert!(lookups[0]["message"].contains("searched for 'Hello' in 'database' with culture 'zh-CN'"));
        assert!(lookups[1..].iter().all(|fields| fields["key"] == "Bye"));
    }
}
