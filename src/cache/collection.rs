// In-memory collection cache.
// Filled once per cache scope, never refreshed; creation is serialized per key.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, OnceCell, RwLock};

use crate::error::Result;

use super::catalog::Catalog;

/// Cache of one remote collection.
///
/// Share a single `Arc<CollectionCache<_>>` between stores to give them the
/// same view; give each request or session its own to keep them isolated.
/// The catalog is loaded at most once. Concurrent first readers wait on the
/// same load, and a failed load leaves the cache empty.
#[derive(Debug)]
pub struct CollectionCache<R> {
    catalog: OnceCell<RwLock<Catalog<R>>>,
    create_locks: parking_lot::Mutex<HashMap<(String, String), Arc<Mutex<()>>>>,
}

impl<R> Default for CollectionCache<R> {
    fn default() -> Self {
        Self {
            catalog: OnceCell::new(),
            create_locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }
}

impl<R> CollectionCache<R> {
    /// An empty, unloaded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the full collection has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.catalog.initialized()
    }

    /// Return the loaded catalog, running `fetch` if this is the first access.
    pub async fn load<F, Fut>(&self, fetch: F) -> Result<&RwLock<Catalog<R>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Catalog<R>>>,
    {
        self.catalog
            .get_or_try_init(|| async move { fetch().await.map(RwLock::new) })
            .await
    }

    /// Claim the creation lock for one (category, name) key.
    ///
    /// Callers for the same key share one lock while any of them holds a
    /// claim. The table entry goes away when the last claim is dropped.
    pub(crate) fn claim_key(&self, category: &str, name: &str) -> KeyClaim<'_, R> {
        let key = (category.to_string(), name.to_string());
        let lock = self.create_locks.lock().entry(key.clone()).or_default().clone();
        KeyClaim {
            cache: self,
            key,
            lock,
        }
    }

    #[cfg(test)]
    pub(crate) fn claimed_keys(&self) -> usize {
        self.create_locks.lock().len()
    }
}

/// A caller's share of a per-key creation lock.
pub(crate) struct KeyClaim<'a, R> {
    cache: &'a CollectionCache<R>,
    key: (String, String),
    lock: Arc<Mutex<()>>,
}

impl<R> KeyClaim<'_, R> {
    /// Wait until no other caller is creating this key.
    pub(crate) async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl<R> Drop for KeyClaim<'_, R> {
    fn drop(&mut self) {
        // Clones are only handed out under the table lock, so a count of two
        // (table and this claim) means nobody else is waiting on the key.
        let mut locks = self.cache.create_locks.lock();
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}
