//! Resource entries and the values handed back to callers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Content keys of one `(resource, locale)` pair mapped to their translation.
///
/// `None` means the key is registered but has no translation yet.
pub type LocaleSet = HashMap<String, Option<String>>;

/// One translatable string as stored in the backing table.
///
/// `(resource_name, locale, content_key)` is unique across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub resource_name: String,
    /// Exact locale name; empty for the invariant locale
    pub locale: String,
    pub content_key: String,
    pub localized_content: Option<String>,
}

impl ResourceEntry {
    /// Create an entry with a translation
    pub fn new(
        resource_name: impl Into<String>,
        locale: impl Into<String>,
        content_key: impl Into<String>,
        localized_content: impl Into<String>,
    ) -> Self {
        Self {
            resource_name: resource_name.into(),
            locale: locale.into(),
            content_key: content_key.into(),
            localized_content: Some(localized_content.into()),
        }
    }

    /// Create a registered-but-untranslated entry
    pub fn placeholder(
        resource_name: impl Into<String>,
        locale: impl Into<String>,
        content_key: impl Into<String>,
    ) -> Self {
        Self {
            resource_name: resource_name.into(),
            locale: locale.into(),
            content_key: content_key.into(),
            localized_content: None,
        }
    }

    /// Whether this entry carries a usable translation
    pub fn is_translated(&self) -> bool {
        self.localized_content.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// A resolved string: the key, the display value, and whether it was found.
///
/// When `found` is false, `value` is the key itself (or the key formatted
/// with the caller's arguments).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedString {
    pub name: String,
    pub value: String,
    pub found: bool,
}

impl LocalizedString {
    pub fn new(name: impl Into<String>, value: impl Into<String>, found: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            found,
        }
    }
}

impl std::fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
