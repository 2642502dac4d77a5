// Client configuration.
// Base URL, page size and HTTP settings, built directly or from the environment.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{CmsError, Result};

/// Page size used when walking a collection.
pub const DEFAULT_PAGE_LIMIT: u32 = 1000;

/// HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_USER_AGENT: &str = concat!("cms-content/", env!("CARGO_PKG_VERSION"));

/// Settings for talking to the CMS REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct CmsConfig {
    /// API root, e.g. `https://cms.example.com/api/`.
    pub base_url: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default = "default_timeout", deserialize_with = "duration_secs::deserialize")]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl CmsConfig {
    /// Config for `base_url` with default page size, timeout and user agent.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page_limit: DEFAULT_PAGE_LIMIT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    /// Build a config from `CMS_API_URL`, `CMS_PAGE_LIMIT` and `CMS_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("CMS_API_URL")
            .filter(|url| !url.is_empty())
            .ok_or(CmsError::MissingBaseUrl)?;
        let mut config = Self::new(base_url);

        if let Some(limit) = lookup("CMS_PAGE_LIMIT") {
            config.page_limit = match limit.parse::<u32>() {
                Ok(0) | Err(_) => {
                    return Err(CmsError::InvalidConfig(format!(
                        "CMS_PAGE_LIMIT must be a positive integer, got {:?}",
                        limit
                    )));
                }
                Ok(n) => n,
            };
        }

        if let Some(secs) = lookup("CMS_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                CmsError::InvalidConfig(format!(
                    "CMS_TIMEOUT_SECS must be a number of seconds, got {:?}",
                    secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Override the page size; zero is raised to 1.
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
