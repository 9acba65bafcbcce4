//! Resolver factory
//!
//! Maps a resource identity (a type, or a base name and location) to one
//! shared [`Resolver`], deriving its resource name from the configured
//! module settings. All resolvers of a factory share its caches; factories
//! share nothing with each other.

use std::sync::Arc;
use dashmap::DashMap;
use crate::{Result, require_non_empty};
use crate::cache::{NameListCache, ResourceCache};
use crate::config::LocalizationOptions;
use crate::locale::Locale;
use crate::naming::{TypeIdentity, derive_resource_name, location_key};
use crate::resolver::Resolver;
use crate::storage::ResourceStore;

pub struct ResolverFactory<S> {
    options: LocalizationOptions,
    cache: Arc<ResourceCache<S>>,
    names: Arc<NameListCache>,
    /// qualified type name -> resolver
    by_type: DashMap<String, Arc<Resolver<S>>>,
    /// `B={base},L={location}` -> resolver
    by_location: DashMap<String, Arc<Resolver<S>>>,
}

impl<S: ResourceStore> ResolverFactory<S> {
    pub fn new(store: S, options: LocalizationOptions) -> Self {
        Self::with_store(Arc::new(store), options)
    }

    /// Build over a store the caller keeps a handle to
    pub fn with_store(store: Arc<S>, options: LocalizationOptions) -> Self {
        Self {
            options,
            cache: Arc::new(ResourceCache::new(store)),
            names: Arc::new(NameListCache::new()),
            by_type: DashMap::new(),
            by_location: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        self.cache.store()
    }

    pub fn options(&self) -> &LocalizationOptions {
        &self.options
    }

    /// Resolver for the Rust type `T`
    pub fn for_type<T: ?Sized + 'static>(&self) -> Result<Arc<Resolver<S>>> {
        self.for_identity(&TypeIdentity::of::<T>())
    }

    /// Resolver for a type identity; the same identity yields the same resolver
    pub fn for_identity(&self, identity: &TypeIdentity) -> Result<Arc<Resolver<S>>> {
        if let Some(resolver) = self.by_type.get(identity.qualified_name()) {
            return Ok(Arc::clone(resolver.value()));
        }

        let (root, subpath) = self.options.module_settings(identity.module());
        let resource_name = derive_resource_name(identity.full_name(), &root, subpath.as_deref())?;
        let resolver = self.create(resource_name)?;

        // A racing caller may have inserted first; keep whichever landed
        let resolver = self
            .by_type
            .entry(identity.qualified_name().to_string())
            .or_insert(resolver)
            .clone();
        Ok(resolver)
    }

    /// Resolver for a base name within a location (module)
    pub fn for_location(&self, base_name: &str, location: &str) -> Result<Arc<Resolver<S>>> {
        require_non_empty(base_name, "base_name")?;
        require_non_empty(location, "location")?;

        let key = location_key(base_name, location);
        if let Some(resolver) = self.by_location.get(&key) {
            return Ok(Arc::clone(resolver.value()));
        }

        let (root, subpath) = self.options.module_settings(location);
        let resource_name = derive_resource_name(base_name, &root, subpath.as_deref())?;
        let resolver = self.create(resource_name)?;

        Ok(self.by_location.entry(key).or_insert(resolver).clone())
    }

    /// Invalidate `locale` on the resolver of type `T`, if one was created
    pub fn invalidate_type<T: ?Sized + 'static>(&self, locale: &Locale) {
        self.invalidate_identity(&TypeIdentity::of::<T>(), locale)
    }

    pub fn invalidate_identity(&self, identity: &TypeIdentity, locale: &Locale) {
        if let Some(resolver) = cached(&self.by_type, identity.qualified_name()) {
            resolver.invalidate(locale);
        }
    }

    pub fn invalidate_location(&self, base_name: &str, location: &str, locale: &Locale) -> Result<()> {
        require_non_empty(base_name, "base_name")?;
        require_non_empty(location, "location")?;

        if let Some(resolver) = cached(&self.by_location, &location_key(base_name, location)) {
            resolver.invalidate(locale);
        }
        Ok(())
    }

    /// Invalidate `locale` on the first resolver serving `resource_name`,
    /// looking at type-keyed resolvers before location-keyed ones
    pub fn invalidate_resource(&self, resource_name: &str, locale: &Locale) -> Result<()> {
        require_non_empty(resource_name, "resource_name")?;

        let resolver = self
            .by_type
            .iter()
            .chain(self.by_location.iter())
            .find(|entry| entry.value().resource_name() == resource_name)
            .map(|entry| Arc::clone(entry.value()));

        if let Some(resolver) = resolver {
            resolver.invalidate(locale);
        }
        Ok(())
    }

    /// Number of resolvers created so far
    pub fn len(&self) -> usize {
        self.by_type.len() + self.by_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.by_location.is_empty()
    }

    fn create(&self, resource_name: String) -> Result<Arc<Resolver<S>>> {
        tracing::debug!(resource = %resource_name, "Creating resolver");
        Ok(Arc::new(Resolver::new(
            resource_name,
            Arc::clone(&self.cache),
            Arc::clone(&self.names),
            self.options.auto_create_missing,
        )?))
    }
}

fn cached<S>(resolvers: &DashMap<String, Arc<Resolver<S>>>, key: &str) -> Option<Arc<Resolver<S>>> {
    resolvers.get(key).map(|resolver| Arc::clone(resolver.value()))
}
