//! Lookup capability: per-site catalog search over HTTP.

mod types;

use std::future::Future;
use std::time::Duration;

use indexmap::IndexMap;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::search::SiteResultSet;
use types::CatalogResponse;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;
const ERROR_SNIPPET_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("no endpoint configured for site '{0}'")]
    UnknownSite(String),

    #[error("catalog rate limit exceeded")]
    RateLimited,

    #[error("catalog returned status {0}")]
    Status(u16),

    #[error("catalog returned an unreadable body: {0}")]
    Decode(String),

    #[error("lookup task aborted: {0}")]
    Aborted(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Searches one external catalog for a query.
/// Implemented by `HttpCatalog` for production; mock implementations used in tests.
pub trait CatalogLookup: Send + Sync {
    fn lookup(
        &self,
        site: &str,
        query: &str,
    ) -> impl Future<Output = Result<SiteResultSet, LookupError>> + Send;
}

/// Catalog client holding one search endpoint per configured site.
///
/// A lookup issues `GET <endpoint>?q=<query>` and expects a JSON body of the
/// form `{"count": n, "items": [{"id", "name", "description", "link"}]}`.
/// Rate-limited and 5xx responses are retried with jittered backoff.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    http: Client,
    endpoints: IndexMap<String, Url>,
    initial_backoff_ms: u64,
}

impl HttpCatalog {
    pub fn new(http: Client, endpoints: IndexMap<String, Url>) -> Self {
        Self {
            http,
            endpoints,
            initial_backoff_ms: INITIAL_BACKOFF_MS,
        }
    }

    #[cfg(test)]
    fn with_backoff(mut self, initial_backoff_ms: u64) -> Self {
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    async fn search_once(
        &self,
        endpoint: &Url,
        query: &str,
    ) -> Result<CatalogResponse, LookupError> {
        let mut url = endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LookupError::RateLimited);
        }
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            let end = text.floor_char_boundary(ERROR_SNIPPET_CHARS);
            LookupError::Decode(format!("{e} (body: {})", &text[..end]))
        })
    }

    /// Equal jitter backoff: base/2 + rand(0, base/2).
    fn jittered_backoff(&self, attempt: u32) -> u64 {
        let base = self.initial_backoff_ms * 2u64.pow(attempt);
        let half = base / 2;
        half + fastrand::u64(..half.max(1))
    }
}

impl CatalogLookup for HttpCatalog {
    async fn lookup(&self, site: &str, query: &str) -> Result<SiteResultSet, LookupError> {
        let endpoint = self
            .endpoints
            .get(site)
            .ok_or_else(|| LookupError::UnknownSite(site.to_string()))?;

        let mut last_err = None;
        for attempt in 0..MAX_ATTEMPTS {
            match self.search_once(endpoint, query).await {
                Ok(body) => {
                    let count = body.count.unwrap_or(body.items.len() as u64);
                    debug!(
                        site,
                        query,
                        count,
                        items = body.items.len(),
                        "catalog lookup complete"
                    );
                    return Ok(SiteResultSet {
                        site: site.to_string(),
                        count,
                        items: body.items,
                    });
                }
                Err(e) if is_retriable(&e) => {
                    last_err = Some(e);
                    if attempt + 1 < MAX_ATTEMPTS {
                        let delay_ms = self.jittered_backoff(attempt);
                        debug!(
                            site,
                            attempt = attempt + 1,
                            delay_ms,
                            "retrying catalog lookup after transient error"
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        warn!(site, attempts = MAX_ATTEMPTS, "catalog lookup exhausted retries");
        Err(last_err.unwrap_or(LookupError::RateLimited))
    }
}

fn is_retriable(e: &LookupError) -> bool {
    matches!(e, LookupError::RateLimited | LookupError::Status(500..=599))
}
