// Option store.
// Typed accessors and editable markup for CMS options.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cache::{Catalog, CollectionCache};
use crate::cms::{CmsClient, OptionValue, RestClient};
use crate::error::Result;
use crate::render::{AttributeMap, editable_markup};

use super::Store;

const EDITABLE_MARKER: &str = "data-option";

/// Named, categorized scalar values from the `options` collection.
pub struct OptionStore<C: ?Sized = CmsClient> {
    store: Store<OptionValue, C>,
}

impl<C: ?Sized> Clone for OptionStore<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C: RestClient + ?Sized> OptionStore<C> {
    /// Create a store with its own empty cache.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            store: Store::new(client),
        }
    }

    /// Create a store that shares `cache` with other stores.
    pub fn with_cache(client: Arc<C>, cache: Arc<CollectionCache<OptionValue>>) -> Self {
        Self {
            store: Store::with_cache(client, cache),
        }
    }

    /// Page size for the initial collection fetch.
    pub fn with_page_limit(self, page_limit: u32) -> Self {
        Self {
            store: self.store.with_page_limit(page_limit),
        }
    }

    /// The underlying generic store.
    pub fn store(&self) -> &Store<OptionValue, C> {
        &self.store
    }

    /// Value of an option. A missing option is created from `default` when given.
    pub async fn option(&self, category: &str, name: &str, default: Option<&str>) -> Result<String> {
        self.store
            .payload(category, name, default.map(str::to_string))
            .await
    }

    /// Attribute fragment marking the option as inline-editable. Makes no request.
    pub fn editable(&self, category: &str, name: &str) -> String {
        editable_markup(EDITABLE_MARKER, category, name, AttributeMap::new())
    }

    /// All options in `category`, by name.
    pub async fn options_by_category(&self, category: &str) -> Result<BTreeMap<String, OptionValue>> {
        self.store.by_category(category).await
    }

    /// Every option, by category and name.
    pub async fn options(&self) -> Result<Catalog<OptionValue>> {
        self.store.all().await
    }
}
