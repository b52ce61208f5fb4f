use crate::config::{PolitenessConfig, ScraperConfig};
use crate::error::FetchError;
use crate::models::FetchKind;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};
use std::time::Duration;
use tokio::time::sleep;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; relative links resolve against it.
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Anything that can turn a URL into a page body.
///
/// Errors are soft: callers treat them as "nothing here" and move on.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, kind: FetchKind) -> Result<FetchedPage, FetchError>;
}

#[derive(Debug)]
pub struct HttpClient {
    inner: reqwest::Client,
    politeness: PolitenessConfig,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig, politeness: PolitenessConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).context("Invalid Accept-Language")?,
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer).context("Invalid Referer")?,
        );

        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            // Accept cookies so session-based pages work
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            inner,
            politeness,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms.max(1),
        })
    }

    /// Sleep for a random duration drawn from the kind's interval.
    async fn polite_delay(&self, kind: FetchKind) {
        let pause = self.politeness.for_kind(kind).sample();
        if !pause.is_zero() {
            debug!("Sleeping {:?} before {} fetch", pause, kind);
            sleep(pause).await;
        }
    }

    async fn get_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let final_url = resp.url().to_string();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(FetchedPage { url: final_url, status: status.as_u16(), body })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str, kind: FetchKind) -> Result<FetchedPage, FetchError> {
        self.polite_delay(kind).await;
        debug!("GET {} ({})", url, kind);

        // 2x, 4x, 8x the base backoff, each jittered
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.retry_backoff_ms)
            .max_delay(Duration::from_secs(30))
            .map(jitter)
            .take(self.max_retries as usize);

        let result = RetryIf::start(
            strategy,
            || self.get_once(url),
            |e: &FetchError| {
                let retry = e.is_retryable();
                if retry {
                    warn!("{}, backing off", e);
                }
                retry
            },
        )
        .await;

        if let Err(e) = &result {
            warn!("{} fetch failed: {}", kind, e);
        }
        result
    }
}
