// CMS REST API module.
// Provides the client seam, record types, pagination and record endpoints.

pub mod client;
pub mod endpoints;
#[cfg(test)]
pub(crate) mod fake;
pub mod pages;
pub mod types;

pub use client::{ApiResponse, CmsClient, RestClient};
pub use pages::{PageCursor, Pages, fetch_all, parse_content_range_total};
pub use types::*;
