// CMS session.
// One client plus a content block store and an option store with fresh caches.

use std::sync::Arc;

use crate::cms::{CmsClient, RestClient};
use crate::config::CmsConfig;
use crate::error::Result;
use crate::store::{ContentBlockStore, OptionStore};

/// Stores whose caches live exactly as long as the session.
///
/// Create one per request (or per longer-lived scope) to control how long
/// fetched collections are reused.
pub struct CmsSession<C: ?Sized = CmsClient> {
    content_blocks: ContentBlockStore<C>,
    options: OptionStore<C>,
}

impl CmsSession<CmsClient> {
    /// Build a reqwest client from `config` and open a session on it.
    pub fn from_config(config: &CmsConfig) -> Result<Self> {
        let client = Arc::new(CmsClient::new(config)?);
        Ok(Self::new(client).with_page_limit(config.page_limit))
    }
}

impl<C: RestClient + ?Sized> CmsSession<C> {
    /// Open a session on an existing client.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            content_blocks: ContentBlockStore::new(client.clone()),
            options: OptionStore::new(client),
        }
    }

    /// Page size used by both stores.
    pub fn with_page_limit(self, page_limit: u32) -> Self {
        Self {
            content_blocks: self.content_blocks.with_page_limit(page_limit),
            options: self.options.with_page_limit(page_limit),
        }
    }

    pub fn content_blocks(&self) -> &ContentBlockStore<C> {
        &self.content_blocks
    }

    pub fn options(&self) -> &OptionStore<C> {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cms::fake::{FakeCms, Method};

    #[tokio::test]
    async fn test_sessions_do_not_share_caches() {
        let cms = Arc::new(
            FakeCms::new()
                .with_collection(
                    "content-blocks",
                    vec![json!({"category": "home", "name": "title", "body": "Welcome"})],
                )
                .with_collection(
                    "options",
                    vec![json!({"category": "site", "name": "phone", "value": "555"})],
                ),
        );

        let first = CmsSession::new(cms.clone());
        assert_eq!(
            first.content_blocks().content_block("home", "title", None).await.unwrap(),
            "Welcome"
        );
        assert_eq!(first.options().option("site", "phone", None).await.unwrap(), "555");
        first.options().option("site", "phone", None).await.unwrap();
        assert_eq!(cms.count(Method::Get), 2);

        let second = CmsSession::new(cms.clone());
        second.options().option("site", "phone", None).await.unwrap();
        assert_eq!(cms.count(Method::Get), 3);
    }

    #[test]
    fn test_from_config() {
        let session = CmsSession::from_config(&CmsConfig::new("http://cms.local/api/").with_page_limit(50)).unwrap();
        assert_eq!(
            session.content_blocks().store().client().base_url().as_str(),
            "http://cms.local/api/"
        );
    }
}
