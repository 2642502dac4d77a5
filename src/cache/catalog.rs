// Two-level record mapping.
// Groups records by category, then by name within the category.

use std::collections::BTreeMap;

use crate::cms::Record;

/// Records keyed by category, then name.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<R> {
    categories: BTreeMap<String, BTreeMap<String, R>>,
}

impl<R> Default for Catalog<R> {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }
}

impl<R: Record> Catalog<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its own category and name, replacing any previous one.
    pub fn insert(&mut self, record: R) {
        let category = record.category().to_string();
        let name = record.name().to_string();
        self.insert_at(category, name, record);
    }

    /// Insert a record under an explicit key.
    pub fn insert_at(&mut self, category: impl Into<String>, name: impl Into<String>, record: R) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(name.into(), record);
    }

    pub fn get(&self, category: &str, name: &str) -> Option<&R> {
        self.categories.get(category)?.get(name)
    }

    /// Records in a category; empty if the category is unknown.
    pub fn category(&self, category: &str) -> BTreeMap<String, R> {
        self.categories.get(category).cloned().unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Total number of records across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(BTreeMap::is_empty)
    }

    /// Every record, ordered by category and then name.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.categories.values().flat_map(BTreeMap::values)
    }
}

impl<R: Record> Extend<R> for Catalog<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}
