// Error types for the CMS content layer.
// Covers REST status failures, malformed responses, transport and config errors.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("Can not get {resource}: HTTP {status}")]
    FetchFailed { resource: String, status: StatusCode },

    #[error("Malformed response from API: {0}")]
    MalformedResponse(String),

    #[error("Can not save {resource}: HTTP {status}")]
    CreateFailed { resource: String, status: StatusCode },

    #[error("Location is not returned from API when creating {resource}")]
    MissingLocation { resource: String },

    #[error("Can not get record by \"{location}\": HTTP {status}")]
    FetchByLocationFailed { location: String, status: StatusCode },

    #[error("CMS API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Missing CMS_API_URL environment variable")]
    MissingBaseUrl,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CmsError>;
