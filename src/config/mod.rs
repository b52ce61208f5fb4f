use crate::error::ConfigError;
use crate::models::{FetchKind, JobSpec};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub politeness: PolitenessConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// HTTP identity and retry behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    #[serde(default = "default_referer")]
    pub referer: String,
}

/// Uniform random sleep interval, in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

/// Request pacing per fetch kind, plus the pause between jobs.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct PolitenessConfig {
    #[serde(default = "default_listing_delay")]
    pub listing: DelayRange,

    #[serde(default = "default_detail_delay")]
    pub detail: DelayRange,

    #[serde(default = "default_between_jobs_delay")]
    pub between_jobs: DelayRange,
}

/// Output sink location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

/// Job list; empty means "use the built-in defaults"
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub jobs: Vec<JobSpec>,

    #[serde(default = "default_pages")]
    pub default_pages: u32,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_timeout_secs() -> u64 {
    8
}
fn default_max_retries() -> u32 {
    2
}
fn default_retry_backoff_ms() -> u64 {
    1000
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36"
        .to_string()
}
fn default_accept_language() -> String {
    "it-IT,it;q=0.9,en-US;q=0.8,en;q=0.7".to_string()
}
fn default_referer() -> String {
    "https://www.google.com/".to_string()
}
fn default_listing_delay() -> DelayRange {
    DelayRange { min_ms: 1000, max_ms: 3000 }
}
fn default_detail_delay() -> DelayRange {
    DelayRange { min_ms: 2000, max_ms: 5000 }
}
fn default_between_jobs_delay() -> DelayRange {
    DelayRange { min_ms: 5000, max_ms: 10000 }
}
fn default_output_path() -> PathBuf {
    PathBuf::from("data/pmi_contatti_reali.csv")
}
fn default_pages() -> u32 {
    3
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            referer: default_referer(),
        }
    }
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self {
            listing: default_listing_delay(),
            detail: default_detail_delay(),
            between_jobs: default_between_jobs_delay(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { output_path: default_output_path() }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { jobs: Vec::new(), default_pages: default_pages() }
    }
}

// ── Politeness ───────────────────────────────────────────────────────────────

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange { min_ms: 0, max_ms: 0 };

    pub fn sample(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        let lo = self.min_ms.min(self.max_ms);
        let hi = self.min_ms.max(self.max_ms);
        Duration::from_millis(rand::random_range(lo..=hi))
    }
}

impl PolitenessConfig {
    /// No sleeping at all. Meant for tests and local fixtures.
    pub fn none() -> Self {
        Self {
            listing: DelayRange::ZERO,
            detail: DelayRange::ZERO,
            between_jobs: DelayRange::ZERO,
        }
    }

    pub fn for_kind(&self, kind: FetchKind) -> DelayRange {
        match kind {
            FetchKind::Listing => self.listing,
            FetchKind::Detail => self.detail,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, range) in [
            ("listing", self.listing),
            ("detail", self.detail),
            ("between_jobs", self.between_jobs),
        ] {
            if range.min_ms > range.max_ms {
                return Err(ConfigError::InvalidDelay {
                    name,
                    min_ms: range.min_ms,
                    max_ms: range.max_ms,
                });
            }
        }
        Ok(())
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("PMI").separator("__"))
            .build()
            .context("Failed to read configuration sources")?;

        let app_cfg: AppConfig = cfg
            .try_deserialize()
            .context("Invalid configuration")?;
        app_cfg.politeness.validate()?;
        Ok(app_cfg)
    }
}
