use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ImageSearchCredentials;

pub const GOOGLE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Result of a best-effort image search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Found(String),
    Fallback,
}

/// Finds an image for a figure name. Implementations never fail: any
/// problem is reported as [`ImageOutcome::Fallback`].
#[async_trait]
pub trait ImageLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> ImageOutcome;
}

/// Used when no search credentials are configured
pub struct DisabledLookup;

#[async_trait]
impl ImageLookup for DisabledLookup {
    async fn lookup(&self, _query: &str) -> ImageOutcome {
        ImageOutcome::Fallback
    }
}

#[derive(Error, Debug)]
enum LookupError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("search returned no image")]
    NoResult,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    link: Option<String>,
}

fn first_link(response: SearchResponse) -> Result<String, LookupError> {
    response
        .items
        .into_iter()
        .next()
        .and_then(|item| item.link)
        .map(|link| link.trim().to_string())
        .filter(|link| !link.is_empty())
        .ok_or(LookupError::NoResult)
}

/// Image search against the Google Custom Search JSON API.
/// One attempt per lookup, bounded by the client timeout.
pub struct GoogleImageSearch {
    client: Client,
    endpoint: String,
    credentials: ImageSearchCredentials,
}

impl GoogleImageSearch {
    pub fn new(credentials: ImageSearchCredentials, timeout: Duration) -> reqwest::Result<Self> {
        Self::with_endpoint(credentials, timeout, GOOGLE_SEARCH_ENDPOINT)
    }

    pub fn with_endpoint(
        credentials: ImageSearchCredentials,
        timeout: Duration,
        endpoint: impl Into<String>,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
            credentials,
        })
    }

    async fn search(&self, query: &str) -> Result<String, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.credentials.api_key.as_str()),
                ("cx", self.credentials.search_scope.as_str()),
                ("searchType", "image"),
                ("q", query),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        first_link(body)
    }
}

#[async_trait]
impl ImageLookup for GoogleImageSearch {
    async fn lookup(&self, query: &str) -> ImageOutcome {
        match self.search(query).await {
            Ok(url) => ImageOutcome::Found(url),
            Err(e) => {
                // reqwest errors can carry the request URL, which holds the key
                let reason = match e {
                    LookupError::Request(err) => LookupError::Request(err.without_url()),
                    other => other,
                };
                warn!("Image search failed for {}, using fallback image: {}", query, reason);
                ImageOutcome::Fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn credentials() -> ImageSearchCredentials {
        ImageSearchCredentials {
            api_key: "test-key".to_string(),
            search_scope: "test-cx".to_string(),
        }
    }

    fn parse(json: &str) -> Result<String, LookupError> {
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        first_link(response)
    }

    #[test]
    fn test_first_link() {
        let json = r#"{"items":[{"link":"https://img.example/a.jpg"},{"link":"https://img.example/b.jpg"}]}"#;
        assert_eq!(parse(json).unwrap(), "https://img.example/a.jpg");
    }

    #[test]
    fn test_missing_results() {
        assert!(matches!(parse("{}"), Err(LookupError::NoResult)));
        assert!(matches!(parse(r#"{"items":[]}"#), Err(LookupError::NoResult)));
        assert!(matches!(parse(r#"{"items":[{"title":"x"}]}"#), Err(LookupError::NoResult)));
        assert!(matches!(parse(r#"{"items":[{"link":"  "}]}"#), Err(LookupError::NoResult)));
    }

    #[actix_web::test]
    async fn test_disabled_lookup_falls_back() {
        assert_eq!(DisabledLookup.lookup("Socrates").await, ImageOutcome::Fallback);
    }

    #[actix_web::test]
    async fn test_unreachable_endpoint_falls_back() {
        // Nothing listens on the discard port locally; the connection is refused
        let search = GoogleImageSearch::with_endpoint(
            credentials(),
            Duration::from_secs(2),
            "http://127.0.0.1:9/customsearch/v1",
        )
        .unwrap();
        assert_eq!(search.lookup("Marie Curie").await, ImageOutcome::Fallback);
    }

    /// Serve exactly one HTTP response on a local port, optionally after a
    /// delay. Returns the endpoint URL.
    async fn serve_once(status: &'static str, body: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/customsearch/v1", addr)
    }

    async fn lookup_against(endpoint: String, timeout: Duration) -> ImageOutcome {
        GoogleImageSearch::with_endpoint(credentials(), timeout, endpoint)
            .unwrap()
            .lookup("Galileo Galilei")
            .await
    }

    #[actix_web::test]
    async fn test_found_from_search_response() {
        let endpoint = serve_once(
            "200 OK",
            r#"{"items":[{"link":"https://img.example/galileo.jpg"}]}"#,
            Duration::ZERO,
        )
        .await;

        assert_eq!(
            lookup_against(endpoint, Duration::from_secs(2)).await,
            ImageOutcome::Found("https://img.example/galileo.jpg".to_string())
        );
    }

    #[actix_web::test]
    async fn test_error_status_falls_back() {
        let endpoint = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#, Duration::ZERO).await;
        assert_eq!(lookup_against(endpoint, Duration::from_secs(2)).await, ImageOutcome::Fallback);
    }

    #[actix_web::test]
    async fn test_malformed_body_falls_back() {
        let endpoint = serve_once("200 OK", "notjson", Duration::ZERO).await;
        assert_eq!(lookup_against(endpoint, Duration::from_secs(2)).await, ImageOutcome::Fallback);
    }

    #[actix_web::test]
    async fn test_empty_items_falls_back() {
        let endpoint = serve_once("200 OK", r#"{"items":[]}"#, Duration::ZERO).await;
        assert_eq!(lookup_against(endpoint, Duration::from_secs(2)).await, ImageOutcome::Fallback);
    }

    #[actix_web::test]
    async fn test_slow_search_times_out() {
        let endpoint = serve_once(
            "200 OK",
            r#"{"items":[{"link":"https://img.example/late.jpg"}]}"#,
            Duration::from_secs(3),
        )
        .await;

        let started = Instant::now();
        let outcome = lookup_against(endpoint, Duration::from_millis(300)).await;
        assert_eq!(outcome, ImageOutcome::Fallback);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
