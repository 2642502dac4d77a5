// CMS REST API HTTP client.
// Defines the transport seam used by the stores and its reqwest implementation.

use async_trait::async_trait;
use reqwest::{
    Client, Response, StatusCode, Url,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::config::CmsConfig;
use crate::error::{CmsError, Result};

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    /// Wrap an already read response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// First value of a header, matched case-insensitively.
    ///
    /// A value that is not visible ASCII is a malformed response, not a
    /// missing header.
    pub fn header(&self, name: &str) -> Result<Option<&str>> {
        self.headers
            .get(name)
            .map(|value| {
                value.to_str().map_err(|_| {
                    CmsError::MalformedResponse(format!("{} header is not valid text: {:?}", name, value))
                })
            })
            .transpose()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Minimal REST operations the content stores need.
///
/// Implementations return every HTTP status as a response; only transport
/// failures are errors. Status interpretation belongs to the caller.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// GET `path` (relative to the API root, or absolute) with query parameters.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse>;

    /// POST `path` with a form-encoded body.
    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<ApiResponse>;
}

/// reqwest-backed client for the CMS REST API.
#[derive(Debug, Clone)]
pub struct CmsClient {
    client: Client,
    base_url: Url,
}

impl CmsClient {
    /// Create a new client from the given configuration.
    pub fn new(config: &CmsConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| CmsError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        // Relative joins must stay below the API root.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client from `CMS_API_URL` and related environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&CmsConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a collection path or a server-returned location against the API root.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CmsError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn read(response: Response) -> Result<ApiResponse> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(ApiResponse::new(status, headers, body))
    }
}

#[async_trait]
impl RestClient for CmsClient {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        let url = self.resolve(path)?;
        trace!(%url, "GET");
        let response = self.client.get(url).query(query).send().await?;
        Self::read(response).await
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<ApiResponse> {
        let url = self.resolve(path)?;
        trace!(%url, "POST");
        let response = self.client.post(url).form(form).send().await?;
        Self::read(response).await
    }
}
