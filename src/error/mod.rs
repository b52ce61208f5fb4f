//! Error taxonomy for a crawl run.
//!
//! Only [`ConfigError`] and [`SinkError`] end a run. [`FetchError`] is the
//! soft-failure variant returned by the fetcher: callers turn it into an
//! empty page or a missing detail payload and keep going.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },
}

impl FetchError {
    /// Worth another attempt after a backoff: throttling answers and
    /// connection-level failures. Timeouts are not, so waits stay bounded.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => *status == 429 || *status == 503,
            FetchError::Network { .. } => true,
            FetchError::Timeout { .. } => false,
        }
    }

    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout { url: url.to_string() }
        } else if let Some(status) = err.status() {
            FetchError::Status { url: url.to_string(), status: status.as_u16() }
        } else {
            FetchError::Network { url: url.to_string(), reason: err.to_string() }
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown source '{0}'")]
    UnknownSource(String),

    #[error("no jobs configured")]
    NoJobs,

    #[error("job {job} has max_pages = 0")]
    ZeroPages { job: String },

    #[error("delay range '{name}' has min_ms {min_ms} > max_ms {max_ms}")]
    InvalidDelay { name: &'static str, min_ms: u64, max_ms: u64 },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot open sink {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write to sink: {0}")]
    Write(#[from] csv::Error),

    #[error("cannot flush sink: {0}")]
    Flush(#[from] std::io::Error),
}

/// Fatal errors of a run. Everything else is absorbed into the summary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
}
