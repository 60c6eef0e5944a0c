use std::time::Duration;
use tracing::{debug, warn};

use super::error::{ApiError, DropReason};
use super::types::{CommentRecord, Feed, HnItem, Story};

const API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

/// Thin client over the read-only HN item API. Items are not cached here;
/// the comment session's tree store holds them for the life of a story.
#[derive(Clone)]
pub struct HnClient {
    http: reqwest::Client,
    base_url: String,
}

impl HnClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "falling back to default http client");
                reqwest::Client::new()
            });
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_feed_ids(&self, feed: Feed) -> Result<Vec<u64>, ApiError> {
        let Some(endpoint) = feed.endpoint() else {
            return Ok(Vec::new());
        };
        let url = format!("{}/{}.json", self.base_url, endpoint);
        let body = self.get_body(&url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches one item. An empty or `null` body is `EmptyPayload`, a
    /// non-success status is `HttpStatus`, a body that does not decode is
    /// `Parse`.
    async fn fetch_item(&self, id: u64) -> Result<HnItem, ApiError> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        let body = self.get_body(&url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_body(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(
                status.as_u16(),
                status.canonical_reason().unwrap_or("").into(),
            ));
        }
        let bytes = response.bytes().await?;
        let trimmed = bytes.trim_ascii();
        if trimmed.is_empty() || trimmed == b"null" {
            return Err(ApiError::EmptyPayload);
        }
        Ok(trimmed.to_vec())
    }

    /// Fetches a comment at the given depth. Any failure means the item is
    /// unavailable and the caller drops it; the `Err` carries the reason for
    /// logging. Moderated records are returned as-is.
    pub async fn fetch_comment(&self, id: u64, depth: usize) -> Result<CommentRecord, DropReason> {
        match self.fetch_item(id).await {
            Ok(item) => Ok(CommentRecord::from_item(item, depth)),
            Err(err) => {
                let reason = err.drop_reason();
                debug!(id, %reason, error = %err, "comment unavailable");
                Err(reason)
            }
        }
    }

    pub async fn fetch_stories_by_ids(&self, ids: &[u64]) -> Vec<Story> {
        let futures: Vec<_> = ids.iter().map(|&id| self.fetch_item(id)).collect();
        let results = futures::future::join_all(futures).await;

        ids.iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(item) => Story::from_item(item),
                Err(err) => {
                    debug!(id, error = %err, "dropping story");
                    None
                }
            })
            .collect()
    }
}

impl Default for HnClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_comment_assigns_depth() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/item/7.json",
            json!({"id": 7, "type": "comment", "by": "pg", "time": 1700000000,
                   "text": "hello", "parent": 5, "kids": [8, 9]}),
        )
        .await;

        let client = HnClient::with_base_url(server.uri());
        let record = client.fetch_comment(7, 3).await.unwrap();
        assert_eq!(record.depth, 3);
        assert_eq!(record.parent_id, 5);
        assert_eq!(record.child_ids, vec![8, 9]);
        assert_eq!(record.author.as_deref(), Some("pg"));
    }

    #[tokio::test]
    async fn test_null_payload_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/1.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let client = HnClient::with_base_url(server.uri());
        assert_eq!(
            client.fetch_comment(1, 0).await,
            Err(DropReason::EmptyPayload)
        );
    }

    #[tokio::test]
    async fn test_empty_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/1.json"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = HnClient::with_base_url(server.uri());
        assert_eq!(
            client.fetch_comment(1, 0).await,
            Err(DropReason::EmptyPayload)
        );
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/1.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HnClient::with_base_url(server.uri());
        assert_eq!(
            client.fetch_comment(1, 0).await,
            Err(DropReason::NetworkUnavailable)
        );
    }

    #[tokio::test]
    async fn test_truncated_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/1.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{truncated"))
            .mount(&server)
            .await;

        let client = HnClient::with_base_url(server.uri());
        assert_eq!(
            client.fetch_comment(1, 0).await,
            Err(DropReason::Malformed)
        );
    }

    #[tokio::test]
    async fn test_deleted_comment_is_returned() {
        let server = MockServer::start().await;
        mount_json(&server, "/item/6.json", json!({"id": 6, "deleted": true})).await;

        let client = HnClient::with_base_url(server.uri());
        let record = client.fetch_comment(6, 1).await.unwrap();
        assert!(record.is_moderated());
    }

    #[tokio::test]
    async fn test_fetch_feed_ids() {
        let server = MockServer::start().await;
        mount_json(&server, "/askstories.json", json!([3, 1, 2])).await;

        let client = HnClient::with_base_url(server.uri());
        assert_eq!(client.fetch_feed_ids(Feed::Ask).await.unwrap(), vec![3, 1, 2]);
        assert!(client.fetch_feed_ids(Feed::Saved).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_stories_keeps_order_and_drops_missing() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/item/1.json",
            json!({"id": 1, "type": "story", "title": "One", "by": "a", "score": 5}),
        )
        .await;
        mount_json(
            &server,
            "/item/3.json",
            json!({"id": 3, "type": "job", "title": "Three", "url": "https://example.com/jobs"}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/item/2.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HnClient::with_base_url(server.uri());
        let stories = client.fetch_stories_by_ids(&[1, 2, 3]).await;
        let ids: Vec<u64> = stories.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(stories[1].is_job());
    }
}
