//! In-process caches in front of the store
//!
//! - [`ResourceCache`]: `(resource, locale)` -> [`crate::LocaleSet`], with
//!   locale-hierarchy fallback
//! - [`NameListCache`]: `(resource, locale)` -> sorted content keys, for
//!   enumeration

pub mod resource;
pub mod names;

pub use resource::ResourceCache;
pub use names::NameListCache;

use crate::locale::Locale;

/// Cache key of one `(resource, locale)` pair
pub fn locale_set_key(resource_name: &str, locale: &Locale) -> String {
    format!("Culture={};resourceName={}", locale.name(), resource_name)
}
