//! NCBI E-utilities client for PubMed.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - Rate limiting (3 req/s without an API key, 10 req/s with one)
//! - Response caching with 5-minute TTL

pub mod xml;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::{Config, eutils};
use crate::error::{ClientError, ClientResult};
use crate::models::ArticleRecord;

pub use xml::parse_pubmed_xml;

/// PubMed E-utilities client.
#[derive(Clone)]
pub struct PubMedClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Response body cache.
    cache: Cache<String, String>,

    /// Contact email sent with every request.
    email: Option<String>,

    /// API key (optional).
    api_key: Option<String>,

    /// E-utilities base URL.
    base_url: String,

    /// Minimum spacing between requests.
    rate_limit_delay: Duration,

    /// Earliest start of the next request, shared by all clones.
    next_slot: Arc<Mutex<Instant>>,

    /// PMIDs per efetch call.
    fetch_batch_size: usize,
}

impl PubMedClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(eutils::MAX_KEEPALIVE)
            .pool_idle_timeout(eutils::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            cache,
            email: config.email.clone(),
            api_key: config.api_key.clone(),
            base_url: config.eutils_url.clone(),
            rate_limit_delay: config.rate_limit_delay,
            next_slot: Arc::new(Mutex::new(Instant::now())),
            fetch_batch_size: config.fetch_batch_size.max(1),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check if a contact email is configured.
    #[must_use]
    pub const fn has_email(&self) -> bool {
        self.email.is_some()
    }

    /// Search PubMed and fetch the matching articles.
    ///
    /// `date_range` holds `YYYY/MM/DD` bounds on the publication date.
    ///
    /// # Errors
    ///
    /// Returns error on API failure or unparseable responses.
    pub async fn search(
        &self,
        query: &str,
        date_range: Option<(&str, &str)>,
        max_results: usize,
    ) -> ClientResult<Vec<ArticleRecord>> {
        let term = build_query(query, date_range);
        let ids = self.esearch(&term, max_results).await?;
        info!(term = %term, found = ids.len(), "PubMed search complete");
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.efetch(&ids).await
    }

    /// Run esearch and return up to `retmax` PMIDs.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn esearch(&self, term: &str, retmax: usize) -> ClientResult<Vec<String>> {
        let url = format!("{}/esearch.fcgi", self.base_url);
        let mut params = self.base_params();
        params.push(("db".to_string(), "pubmed".to_string()));
        params.push(("term".to_string(), term.to_string()));
        params.push(("retmax".to_string(), retmax.to_string()));
        params.push(("retmode".to_string(), "json".to_string()));

        let body = self.get_text(&url, &params).await?;

        #[derive(serde::Deserialize)]
        struct ESearchResponse {
            esearchresult: ESearchResult,
        }

        #[derive(serde::Deserialize)]
        struct ESearchResult {
            #[serde(default)]
            idlist: Vec<String>,
            #[serde(default, rename = "ERROR")]
            error: Option<String>,
        }

        let response: ESearchResponse = serde_json::from_str(&body)?;
        if let Some(error) = response.esearchresult.error {
            return Err(ClientError::bad_request(error));
        }
        Ok(response.esearchresult.idlist)
    }

    /// Fetch full records for `ids`, in batches.
    ///
    /// # Errors
    ///
    /// Returns error on API failure or malformed XML.
    pub async fn efetch(&self, ids: &[String]) -> ClientResult<Vec<ArticleRecord>> {
        let url = format!("{}/efetch.fcgi", self.base_url);
        let mut articles = Vec::with_capacity(ids.len());

        for (batch, chunk) in ids.chunks(self.fetch_batch_size).enumerate() {
            let mut params = self.base_params();
            params.push(("db".to_string(), "pubmed".to_string()));
            params.push(("id".to_string(), chunk.join(",")));
            params.push(("retmode".to_string(), "xml".to_string()));

            let body = self.get_text(&url, &params).await?;
            let parsed = parse_pubmed_xml(&body)?;
            debug!(batch, requested = chunk.len(), parsed = parsed.len(), "Fetched batch");
            articles.extend(parsed);
        }

        Ok(articles)
    }

    fn base_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("tool".to_string(), eutils::TOOL_NAME.to_string())];
        if let Some(ref email) = self.email {
            params.push(("email".to_string(), email.clone()));
        }
        if let Some(ref key) = self.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }
        params
    }

    /// Make a GET request and return the body text.
    async fn get_text(&self, url: &str, params: &[(String, String)]) -> ClientResult<String> {
        // Check cache
        let cache_key = self.cache_key("GET", url, params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            return Ok(cached);
        }

        self.pace().await;

        let response = self.client.get(url).query(params).send().await?;

        let response = self.handle_response(response).await?;
        let body = response.text().await?;

        // Cache response
        self.cache.insert(cache_key, body.clone()).await;

        Ok(body)
    }

    /// Wait for this request's slot. Slots are handed out in call order, one
    /// per `rate_limit_delay`, across every clone of the client.
    async fn pace(&self) {
        if self.rate_limit_delay.is_zero() {
            return;
        }
        let slot = {
            let mut next = self.next_slot.lock().await;
            let slot = (*next).max(Instant::now());
            *next = slot + self.rate_limit_delay;
            slot
        };
        tokio::time::sleep_until(slot).await;
    }

    /// Handle API response status codes.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                Err(ClientError::rate_limited(retry_after))
            }
            404 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::not_found(text))
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }

    /// Generate cache key. The API key is left out.
    fn cache_key(&self, method: &str, url: &str, params: &[(String, String)]) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");

        for (k, v) in params.iter().filter(|(k, _)| k != "api_key") {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b"&");
        }

        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Debug for PubMedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PubMedClient")
            .field("base_url", &self.base_url)
            .field("has_email", &self.has_email())
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}

/// Append a publication-date filter to a PubMed query.
#[must_use]
pub fn build_query(query: &str, date_range: Option<(&str, &str)>) -> String {
    match date_range {
        Some((start, end)) => {
            format!(r#"{query} AND ("{start}"[Date - Publication] : "{end}"[Date - Publication])"#)
        }
        None => query.to_string(),
    }
}
