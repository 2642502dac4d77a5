// Content block store.
// Typed accessors and editable markup for CMS content blocks.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cache::{Catalog, CollectionCache};
use crate::cms::{BlockDraft, CmsClient, ContentBlock, RestClient};
use crate::error::Result;
use crate::render::{AttributeMap, editable_markup};

use super::Store;

const EDITABLE_MARKER: &str = "data-content-block";

/// Named, categorized text fragments from the `content-blocks` collection.
pub struct ContentBlockStore<C: ?Sized = CmsClient> {
    store: Store<ContentBlock, C>,
}

impl<C: ?Sized> Clone for ContentBlockStore<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C: RestClient + ?Sized> ContentBlockStore<C> {
    /// Create a store with its own empty cache.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            store: Store::new(client),
        }
    }

    /// Create a store that shares `cache` with other stores.
    pub fn with_cache(client: Arc<C>, cache: Arc<CollectionCache<ContentBlock>>) -> Self {
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
    pub fn store(&self) -> &Store<ContentBlock, C> {
        &self.store
    }

    /// Body of a block. A missing block is created from `default` when given.
    pub async fn content_block(&self, category: &str, name: &str, default: Option<&str>) -> Result<String> {
        self.content_block_wysiwyg(category, name, default, false).await
    }

    /// Like [`content_block`](Self::content_block), flagging a created block for WYSIWYG editing.
    pub async fn content_block_wysiwyg(
        &self,
        category: &str,
        name: &str,
        default: Option<&str>,
        wysiwyg: bool,
    ) -> Result<String> {
        let draft = default.map(|body| BlockDraft {
            body: body.to_string(),
            wysiwyg,
        });
        self.store.payload(category, name, draft).await
    }

    /// The block's attributes as name to body, in record order.
    pub async fn content_block_attributes(&self, category: &str, name: &str) -> Result<AttributeMap> {
        let block = self.store.find(category, name).await?;
        Ok(block
            .map(|b| b.attributes.into_iter().map(|a| (a.name, a.body)).collect::<AttributeMap>())
            .unwrap_or_default())
    }

    /// Attribute fragment marking the block as inline-editable.
    pub async fn editable(&self, category: &str, name: &str) -> Result<String> {
        let attributes = self.content_block_attributes(category, name).await?;
        Ok(editable_markup(EDITABLE_MARKER, category, name, attributes))
    }

    /// All blocks in `category`, by name.
    pub async fn content_blocks_by_category(&self, category: &str) -> Result<BTreeMap<String, ContentBlock>> {
        self.store.by_category(category).await
    }

    /// Every block, by category and name.
    pub async fn content_blocks(&self) -> Result<Catalog<ContentBlock>> {
        self.store.all().await
    }
}
