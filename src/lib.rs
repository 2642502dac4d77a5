// Cached content blocks and options over a CMS REST API.
// Fetches collections once, creates missing records from defaults, renders editable markup.

pub mod cache;
pub mod cms;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod store;

pub use cache::{Catalog, CollectionCache};
pub use cms::{ApiResponse, BlockDraft, CmsClient, ContentAttribute, ContentBlock, OptionValue, Record, RestClient};
pub use config::CmsConfig;
pub use error::{CmsError, Result};
pub use render::AttributeMap;
pub use session::CmsSession;
pub use store::{ContentBlockStore, Ensured, OptionStore, Store};
