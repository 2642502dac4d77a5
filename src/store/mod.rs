// Cached record stores.
// Generic fetch-once lookup and create-on-miss shared by content blocks and options.

pub mod content_blocks;
pub mod options;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{Catalog, CollectionCache};
use crate::cms::{Record, RestClient, endpoints, pages};
use crate::config::DEFAULT_PAGE_LIMIT;
use crate::error::Result;

pub use content_blocks::ContentBlockStore;
pub use options::OptionStore;

/// Outcome of [`Store::ensure`].
#[derive(Debug, Clone, PartialEq)]
pub enum Ensured<R> {
    /// The record was already cached.
    Found(R),
    /// The record was missing and has been created from the draft.
    Created(R),
    /// The record is missing and no draft was supplied; nothing was written.
    Missing,
}

impl<R> Ensured<R> {
    /// The found or created record.
    pub fn record(&self) -> Option<&R> {
        match self {
            Ensured::Found(record) | Ensured::Created(record) => Some(record),
            Ensured::Missing => None,
        }
    }

    /// Take the found or created record.
    pub fn into_record(self) -> Option<R> {
        match self {
            Ensured::Found(record) | Ensured::Created(record) => Some(record),
            Ensured::Missing => None,
        }
    }
}

/// Records of one collection, fetched once and looked up from memory.
pub struct Store<R, C: ?Sized> {
    client: Arc<C>,
    cache: Arc<CollectionCache<R>>,
    page_limit: u32,
}

impl<R, C: ?Sized> Clone for Store<R, C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            cache: self.cache.clone(),
            page_limit: self.page_limit,
        }
    }
}

impl<R: Record, C: RestClient + ?Sized> Store<R, C> {
    /// Create a store with its own empty cache.
    pub fn new(client: Arc<C>) -> Self {
        Self::with_cache(client, Arc::new(CollectionCache::new()))
    }

    /// Create a store that shares `cache` with other stores.
    pub fn with_cache(client: Arc<C>, cache: Arc<CollectionCache<R>>) -> Self {
        Self {
            client,
            cache,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Page size for the initial collection fetch (at least 1).
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    /// The cache backing this store.
    pub fn cache(&self) -> &Arc<CollectionCache<R>> {
        &self.cache
    }

    /// The REST client used for fetches and creates.
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    async fn catalog(&self) -> Result<&RwLock<Catalog<R>>> {
        self.cache
            .load(|| pages::fetch_all::<R, C>(self.client.as_ref(), self.page_limit))
            .await
    }

    /// Every record, by category and name.
    pub async fn all(&self) -> Result<Catalog<R>> {
        Ok(self.catalog().await?.read().await.clone())
    }

    /// Records in `category`; empty if the category does not exist.
    pub async fn by_category(&self, category: &str) -> Result<BTreeMap<String, R>> {
        Ok(self.catalog().await?.read().await.category(category))
    }

    /// The cached record at `(category, name)`, if any.
    pub async fn find(&self, category: &str, name: &str) -> Result<Option<R>> {
        Ok(self.catalog().await?.read().await.get(category, name).cloned())
    }

    /// Look up a record, creating it from `draft` if it does not exist.
    ///
    /// Only one creation per key runs at a time; callers that waited re-check
    /// the cache and see the record created by the first.
    pub async fn ensure(&self, category: &str, name: &str, draft: Option<&R::Draft>) -> Result<Ensured<R>> {
        if let Some(record) = self.find(category, name).await? {
            return Ok(Ensured::Found(record));
        }

        let Some(draft) = draft else {
            return Ok(Ensured::Missing);
        };

        // The guard drops before the claim, also when this future is cancelled.
        let claim = self.cache.claim_key(category, name);
        let _guard = claim.acquire().await;
        self.create_locked(category, name, draft).await
    }

    async fn create_locked(&self, category: &str, name: &str, draft: &R::Draft) -> Result<Ensured<R>> {
        if let Some(record) = self.find(category, name).await? {
            debug!(resource = R::COLLECTION, category, name, "created by a concurrent caller");
            return Ok(Ensured::Found(record));
        }

        let record = endpoints::create_record::<R, C>(self.client.as_ref(), category, name, draft).await?;

        self.catalog()
            .await?
            .write()
            .await
            .insert_at(category, name, record.clone());

        Ok(Ensured::Created(record))
    }

    /// Payload for `(category, name)`, creating the record from `draft` when missing.
    ///
    /// On a miss the caller's draft payload is returned (or the empty string
    /// without a draft), not the server copy.
    pub(crate) async fn payload(&self, category: &str, name: &str, draft: Option<R::Draft>) -> Result<String> {
        let ensured = self.ensure(category, name, draft.as_ref()).await?;
        Ok(match ensured {
            Ensured::Found(record) => record.payload().to_string(),
            Ensured::Created(_) | Ensured::Missing => draft
                .as_ref()
                .map(|d| R::draft_payload(d).to_string())
                .unwrap_or_default(),
        })
    }
}
