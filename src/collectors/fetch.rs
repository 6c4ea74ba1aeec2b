use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::collectors::state::uri_component;
use crate::error::CollectorError;

pub const DEFAULT_BASE_URL: &str = "https://hiring.cafe";
pub const PAGE_SIZE: usize = 40;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Headers of a top-level browser navigation. HiringCafe blocks requests
/// that don't look like one.
const BROWSER_HEADERS: [(&str, &str); 5] = [
    ("Accept", "application/json,text/html,*/*;q=0.8"),
    ("Accept-Language", "de-DE,de;q=0.9,en;q=0.8"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
];

/// Waits between requests. Swapped out in tests to record delays instead of
/// sleeping through them.
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Backoff for HTTP 429: `max_retries` retries, waiting `base_delay` and
/// doubling after each one.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

/// One page of the search-jobs response.
#[derive(Debug, Deserialize)]
pub struct RawPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<Value>,
    #[serde(default)]
    pub total: Option<u64>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fetches search result pages with browser-like headers.
pub struct PageFetcher {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    pause: Arc<dyn Pause>,
}

impl PageFetcher {
    pub fn new(base_url: &str) -> Result<Self, CollectorError> {
        Self::with_policy(base_url, RetryPolicy::default(), Arc::new(TokioPause))
    }

    pub fn with_policy(
        base_url: &str,
        retry: RetryPolicy,
        pause: Arc<dyn Pause>,
    ) -> Result<Self, CollectorError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
            pause,
        })
    }

    pub fn search_url(&self, encoded_state: &str, page: u32) -> String {
        format!(
            "{}/api/search-jobs?s={}&size={PAGE_SIZE}&page={page}",
            self.base_url,
            uri_component(encoded_state)
        )
    }

    /// Fetch a single page, retrying on 429 with exponential backoff.
    pub async fn fetch(&self, encoded_state: &str, page: u32) -> Result<RawPage, CollectorError> {
        let url = self.search_url(encoded_state, page);
        tracing::debug!("GET {url}");

        let mut backoff = self.retry.base_delay;
        let mut attempt = 0;
        loop {
            let mut request = self.client.get(&url);
            for (name, value) in BROWSER_HEADERS {
                request = request.header(name, value);
            }
            let resp = request.send().await?;
            let status = resp.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt >= self.retry.max_retries {
                    return Err(CollectorError::RateLimitExhausted {
                        target: "HiringCafe",
                        retries: self.retry.max_retries,
                    });
                }
                attempt += 1;
                tracing::warn!(
                    "HiringCafe 429 on page {page}, retrying in {}s (attempt {attempt}/{})",
                    backoff.as_secs_f64(),
                    self.retry.max_retries
                );
                self.pause.pause(backoff).await;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                return Err(CollectorError::Http {
                    target: "HiringCafe",
                    status: status.as_u16(),
                });
            }

            return Ok(resp.json::<RawPage>().await?);
        }
    }
}
