//! Locale identifiers and their fallback hierarchy
//!
//! A locale is a `-`-separated list of subtags (`zh-Hant-TW`). Its parent is
//! the same list with the last subtag removed, terminating at the invariant
//! locale (empty name), which is its own parent:
//!
//! `zh-Hant-TW` -> `zh-Hant` -> `zh` -> invariant

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A locale name such as `en`, `zh-CN` or the invariant locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Locale {
    name: String,
}

impl Locale {
    /// Parse a locale name. `_` is accepted as a subtag separator.
    ///
    /// Empty names are rejected; use [`Locale::invariant`] for the root.
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::empty("locale"));
        }

        let normalized = name.replace('_', "-");
        if normalized.split('-').any(|tag| tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric())) {
            return Err(Error::InvalidArgument(format!("Invalid locale name: {}", name)));
        }

        Ok(Self { name: normalized })
    }

    /// The root of every locale chain
    pub fn invariant() -> Self {
        Self { name: String::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_invariant(&self) -> bool {
        self.name.is_empty()
    }

    /// The next less specific locale. The invariant locale is its own parent.
    pub fn parent(&self) -> Locale {
        match self.name.rsplit_once('-') {
            Some((parent, _)) => Self { name: parent.to_string() },
            None => Self::invariant(),
        }
    }

    /// Walk from this locale up to and including the invariant locale
    pub fn chain(&self) -> Chain {
        Chain { next: Some(self.clone()) }
    }
}

/// Iterator over a locale and its ancestors, most specific first
#[derive(Debug, Clone)]
pub struct Chain {
    next: Option<Locale>,
}

impl Iterator for Chain {
    type Item = Locale;

    fn next(&mut self) -> Option<Locale> {
        let current = self.next.take()?;
        if !current.is_invariant() {
            self.next = Some(current.parent());
        }
        Some(current)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Serialize for Locale {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.name)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Locale::invariant());
        }
        Locale::new(&s).map_err(serde::de::Error::custom)
    }
}
