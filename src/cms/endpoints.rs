// CMS REST API record endpoints.
// Creates records in a collection and reads them back by server-returned location.

use reqwest::StatusCode;
use tracing::{info, warn};

use crate::error::{CmsError, Result};

use super::client::RestClient;
use super::types::Record;

/// Create a record from a draft and fetch the server's copy of it.
pub async fn create_record<R, C>(client: &C, category: &str, name: &str, draft: &R::Draft) -> Result<R>
where
    R: Record,
    C: RestClient + ?Sized,
{
    let form = R::creation_form(category, name, draft);
    let response = client.post_form(R::COLLECTION, &form).await?;

    if response.status != StatusCode::CREATED {
        warn!(resource = R::COLLECTION, category, name, status = %response.status, "create failed");
        return Err(CmsError::CreateFailed {
            resource: R::COLLECTION.to_string(),
            status: response.status,
        });
    }

    let location = response
        .header("Location")?
        .ok_or_else(|| CmsError::MissingLocation {
            resource: R::COLLECTION.to_string(),
        })?;

    info!(resource = R::COLLECTION, category, name, location, "created record");
    fetch_by_location(client, location).await
}

/// Fetch a single record from a location returned by the API.
pub async fn fetch_by_location<R, C>(client: &C, location: &str) -> Result<R>
where
    R: Record,
    C: RestClient + ?Sized,
{
    let response = client.get(location, &[]).await?;

    if response.status != StatusCode::OK {
        warn!(location, status = %response.status, "fetch by location failed");
        return Err(CmsError::FetchByLocationFailed {
            location: location.to_string(),
            status: response.status,
        });
    }

    response.json()
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, LOCATION};
    use serde_json::json;

    use super::*;
    use crate::cms::fake::{FakeCms, Method, reply};
    use crate::cms::{ApiResponse, BlockDraft, ContentBlock, OptionValue};

    #[tokio::test]
    async fn test_create_posts_form_and_reads_location() {
        let cms = FakeCms::new();
        let draft = BlockDraft {
            body: "fallback".to_string(),
            wysiwyg: false,
        };

        let block: ContentBlock = create_record(&cms, "home", "missing", &draft).await.unwrap();
        assert_eq!(block.category, "home");
        assert_eq!(block.name, "missing");
        assert_eq!(block.body, "fallback");
        assert_eq!(block.extra.get("id"), Some(&json!(1)));

        let requests = cms.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "content-blocks");
        assert_eq!(requests[0].param("body"), Some("fallback".to_string()));
        assert_eq!(requests[0].param("wysiwyg"), Some("0".to_string()));
        assert_eq!(requests[1].method, Method::Get);
        assert_eq!(requests[1].path, "/content-blocks/1");
    }

    #[tokio::test]
    async fn test_create_requires_created_status() {
        let cms = FakeCms::new();
        cms.respond_once(Method::Post, "options", reply(200, json!({}), &[]));

        let err = create_record::<OptionValue, _>(&cms, "site", "phone", &"555".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CmsError::CreateFailed { status, .. } if status == StatusCode::OK
        ));
        assert_eq!(cms.count(Method::Get), 0);
    }

    #[tokio::test]
    async fn test_create_requires_location() {
        let cms = FakeCms::new();
        cms.respond_once(Method::Post, "options", reply(201, json!({}), &[]));

        let err = create_record::<OptionValue, _>(&cms, "site", "phone", &"555".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::MissingLocation { .. }));
    }

    #[tokio::test]
    async fn test_fetch_by_location_requires_ok() {
        let cms = FakeCms::new();
        cms.respond_once(
            Method::Post,
            "options",
            reply(201, json!(null), &[(LOCATION, "/options/9")]),
        );

        let err = create_record::<OptionValue, _>(&cms, "site", "phone", &"555".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CmsError::FetchByLocationFailed { ref location, status }
                if location == "/options/9" && status == StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_non_ascii_location() {
        let cms = FakeCms::new();
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_bytes(b"/options/\xC3\xA9").unwrap());
        cms.respond_once(
            Method::Post,
            "options",
            ApiResponse::new(StatusCode::CREATED, headers, ""),
        );

        let err = create_record::<OptionValue, _>(&cms, "site", "phone", &"555".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::MalformedResponse(_)));
        assert_eq!(cms.count(Method::Get), 0);
    }
}
