// Paginated collection fetching.
// Walks a collection endpoint with _offset/_limit until the API reports no more records.

use std::marker::PhantomData;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::cache::Catalog;
use crate::error::{CmsError, Result};

use super::client::RestClient;
use super::types::Record;

/// Position within a paginated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    offset: u64,
    limit: u32,
    done: bool,
}

impl PageCursor {
    /// Cursor at the first page; a zero `limit` is raised to 1.
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            done: false,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Query parameters for the current page.
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("_offset", self.offset.to_string()),
            ("_limit", self.limit.to_string()),
        ]
    }

    /// Move past the page just read.
    ///
    /// More pages follow only for a non-empty 206 response whose
    /// `Content-Range` total exceeds `offset + limit`. The header is read
    /// only when that decision needs it.
    pub fn advance(
        &mut self,
        status: StatusCode,
        page_len: usize,
        content_range: Option<&str>,
    ) -> Result<()> {
        let next = self.offset + u64::from(self.limit);

        let more = status == StatusCode::PARTIAL_CONTENT
            && page_len > 0
            && match content_range {
                Some(header) => parse_content_range_total(header)? > next,
                None => {
                    return Err(CmsError::MalformedResponse(
                        "Header \"Content-Range\" is not returned from API".to_string(),
                    ));
                }
            };

        if more {
            self.offset = next;
        } else {
            self.done = true;
        }
        Ok(())
    }
}

/// Parse the total from a `Content-Range` value shaped `<start>-<end>/<total>`.
pub fn parse_content_range_total(header: &str) -> Result<u64> {
    let malformed = || CmsError::MalformedResponse(format!("Invalid Content-Range {:?}", header));

    let (_, total) = header.rsplit_once('/').ok_or_else(malformed)?;
    total.trim().parse().map_err(|_| malformed())
}

/// Lazy sequence of collection pages.
///
/// Each call to [`Pages::next_page`] issues one request. Once the last
/// page has been read it returns `Ok(None)`; an error ends the sequence.
pub struct Pages<'a, R, C: ?Sized> {
    client: &'a C,
    cursor: PageCursor,
    _record: PhantomData<fn() -> R>,
}

impl<'a, R: Record, C: RestClient + ?Sized> Pages<'a, R, C> {
    pub fn new(client: &'a C, limit: u32) -> Self {
        Self {
            client,
            cursor: PageCursor::new(limit),
            _record: PhantomData,
        }
    }

    /// Where the next request will start.
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Fetch the next page, or `None` when the collection is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<R>>> {
        if self.cursor.is_done() {
            return Ok(None);
        }

        let offset = self.cursor.offset();
        let response = match self.client.get(R::COLLECTION, &self.cursor.query()).await {
            Ok(response) => response,
            Err(e) => {
                self.cursor.done = true;
                return Err(e);
            }
        };

        if response.status != StatusCode::OK && response.status != StatusCode::PARTIAL_CONTENT {
            self.cursor.done = true;
            warn!(resource = R::COLLECTION, offset, status = %response.status, "collection fetch failed");
            return Err(CmsError::FetchFailed {
                resource: R::COLLECTION.to_string(),
                status: response.status,
            });
        }

        let page = response.json::<Vec<R>>().and_then(|page| {
            self.cursor
                .advance(response.status, page.len(), response.header("Content-Range")?)?;
            Ok(page)
        });
        if page.is_err() {
            self.cursor.done = true;
        }
        let page = page?;

        debug!(
            resource = R::COLLECTION,
            offset,
            count = page.len(),
            status = %response.status,
            "fetched page"
        );
        Ok(Some(page))
    }
}

/// Fetch every page of a collection into a catalog.
pub async fn fetch_all<R, C>(client: &C, limit: u32) -> Result<Catalog<R>>
where
    R: Record,
    C: RestClient + ?Sized,
{
    let mut pages = Pages::<R, C>::new(client, limit);
    let mut catalog = Catalog::new();

    while let Some(page) = pages.next_page().await? {
        catalog.extend(page);
    }

    debug!(resource = R::COLLECTION, records = catalog.len(), "collection loaded");
    Ok(catalog)
}
