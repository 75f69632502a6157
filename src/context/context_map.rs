// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered key/value storage for diagnostic context.

use std::collections::{BTreeMap, HashMap};

/// An insertion-ordered map from context key to value.
///
/// Context maps hold a handful of entries, so this is a vector with linear lookup.
/// Re-inserting a key replaces the value but keeps the key's original position.
///
/// ```rust
/// use buildwise::context::ContextMap;
///
/// let mut map = ContextMap::new();
/// map.insert("maven.project.id", "com.acme:widget:1.0");
/// map.insert("maven.mojo.goal", "compile");
/// map.insert("maven.project.id", "com.acme:gadget:2.0");
///
/// let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
/// assert_eq!(keys, ["maven.project.id", "maven.mojo.goal"]);
/// assert_eq!(map.get("maven.project.id"), Some("com.acme:gadget:2.0"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContextMap {
    entries: Vec<(String, String)>,
}

impl ContextMap {
    /// Creates an empty map.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The value stored for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes `key`, returning its value.  Later entries keep their relative order.
    ///
    /// ```rust
    /// use buildwise::context::ContextMap;
    ///
    /// let mut map: ContextMap = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
    /// assert_eq!(map.remove("b").as_deref(), Some("2"));
    /// assert_eq!(map.remove("b"), None);
    /// assert_eq!(map.iter().collect::<Vec<_>>(), [("a", "1"), ("c", "3")]);
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContextMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ContextMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// The diagnostic properties a log event captured when it was created.
///
/// Logging backends copy the thread's diagnostic store into each event so an
/// asynchronous appender can format it later on another thread.  Whatever map type the
/// backend uses for that copy only needs to answer lookups by key.
pub trait EventProperties {
    fn property(&self, key: &str) -> Option<&str>;
}

impl EventProperties for ContextMap {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

impl<S: std::hash::BuildHasher> EventProperties for HashMap<String, String, S> {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl EventProperties for BTreeMap<String, String> {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<T: EventProperties + ?Sized> EventProperties for &T {
    fn property(&self, key: &str) -> Option<&str> {
        (**self).property(key)
    }
}
