//! HTTP client with timeouts, retry logic and response caching

use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use feu_core::error::FeuError;

use crate::cache::MetadataCache;
use crate::RegistryResult;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const PYPI_URL: &str = "https://pypi.org";
const GITHUB_API_URL: &str = "https://api.github.com";

/// Configuration for exponential backoff retry logic
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// A failed attempt and whether another attempt may succeed
struct Failure {
    error: FeuError,
    retry: bool,
}

impl Failure {
    fn transient(error: FeuError) -> Self {
        Self { error, retry: true }
    }

    fn permanent(error: FeuError) -> Self {
        Self { error, retry: false }
    }
}

/// Client for the PyPI JSON API and the GitHub REST API
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    pub(crate) retry_config: RetryConfig,
    pub(crate) pypi_url: String,
    pub(crate) github_url: String,
    pub(crate) github_token: Option<String>,
    cache: Arc<MetadataCache>,
}

impl RegistryClient {
    /// Create a client with the default timeout; `GITHUB_TOKEN` is picked
    /// up from the environment when set
    pub fn new() -> RegistryResult<Self> {
        Self::with_config(RetryConfig::default(), DEFAULT_TIMEOUT)
    }

    /// Create a client with custom retry and timeout settings
    pub fn with_config(retry_config: RetryConfig, timeout: Duration) -> RegistryResult<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("feu/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeuError::network(format!("Failed to create HTTP client: {}", e), e))?;

        let github_token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Ok(Self {
            client,
            retry_config,
            pypi_url: PYPI_URL.to_string(),
            github_url: GITHUB_API_URL.to_string(),
            github_token,
            cache: Arc::new(MetadataCache::new()),
        })
    }

    /// Point PyPI requests at another index, e.g. a mirror
    pub fn with_pypi_url(mut self, url: impl Into<String>) -> Self {
        self.pypi_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_github_url(mut self, url: impl Into<String>) -> Self {
        self.github_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token;
        self
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Execute a request with exponential backoff retry logic
    async fn with_retry<F, Fut, T>(&self, operation: F) -> RegistryResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, Failure>>,
    {
        let mut delay = self.retry_config.initial_delay;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(failure) => {
                    if !failure.retry || attempt >= self.retry_config.max_retries {
                        return Err(failure.error);
                    }
                    attempt += 1;
                    warn!("Attempt {} failed, retrying in {:?}: {}", attempt, delay, failure.error);

                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(
                        Duration::from_millis((delay.as_millis() as f64 * self.retry_config.multiplier) as u64),
                        self.retry_config.max_delay,
                    );
                },
            }
        }
    }

    /// GET a URL, retrying transient failures; only success statuses are returned
    pub(crate) async fn get(&self, url: &str, headers: &HeaderMap) -> RegistryResult<Response> {
        self.with_retry(|| async move {
            debug!("GET {}", url);
            let response = self
                .client
                .get(url)
                .headers(headers.clone())
                .send()
                .await
                .map_err(|e| transport_failure(url, e))?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let error = FeuError::Network {
                message: format!("Network or HTTP error: {} returned status {}", url, status),
                source: None,
            };
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                Err(Failure::transient(error))
            } else {
                Err(Failure::permanent(error))
            }
        })
        .await
    }

    /// Fetch and decode a JSON document
    pub async fn fetch_json(&self, url: &str, headers: &HeaderMap) -> RegistryResult<Value> {
        let response = self.get(url, headers).await?;
        decode_json(url, response).await
    }

    /// Fetch a JSON document, serving fresh copies from the cache
    pub async fn fetch_json_cached(&self, url: &str, headers: &HeaderMap) -> RegistryResult<Value> {
        if let Some(body) = self.cache.get(url) {
            debug!("Cache hit for {}", url);
            return Ok(body);
        }
        let body = self.fetch_json(url, headers).await?;
        self.cache.insert(url.to_string(), body.clone());
        Ok(body)
    }
}

fn transport_failure(url: &str, error: reqwest::Error) -> Failure {
    let message = if error.is_timeout() {
        format!("Request to {} timed out", url)
    } else {
        format!("Network or HTTP error while fetching {}: {}", url, error)
    };
    Failure::transient(FeuError::network(message, error))
}

/// Read a response body as JSON
pub(crate) async fn decode_json(url: &str, response: Response) -> RegistryResult<Value> {
    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FeuError::network(format!("Request to {} timed out", url), e)
        } else {
            FeuError::network(format!("Network or HTTP error while reading {}: {}", url, e), e)
        }
    })?;
    serde_json::from_str(&body).map_err(|e| invalid_json(url, e))
}

pub(crate) fn invalid_json(url: &str, error: serde_json::Error) -> FeuError {
    FeuError::network(format!("Invalid JSON from {}: {}", url, error), error)
}

#[cfg(test)]
mod tests;
