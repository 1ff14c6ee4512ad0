//! The media catalog: one entry per discovered file, keyed by file name.

mod format;
pub mod store;

pub use format::{format_entry, format_locations, FormatError};
pub use store::{load, save, StoreError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One discovered media file.
///
/// Fields are declared in key order so the serialized object is sorted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Text after the last `.` of `name`.
    pub format: String,
    /// Last path segment, as listed by the server. Catalog key.
    pub name: String,
    /// Full location of the file.
    pub url: String,
    /// First path segment below the base URL (a year for conference archives).
    #[serde(rename = "year")]
    pub group: String,
}

/// Entries keyed by name, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; an existing entry with the same name is replaced and returned.
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(entry.name.clone(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.entries.into_values().collect()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}
