//! Source orchestrator: jobs → listing pages → detail pages → sink.
//!
//! ## Control flow
//!
//! Jobs run one after another in declaration order; inside a job, pages run
//! `1..=max_pages` and stop early on the first page with no items. A page
//! whose fetch failed counts as empty, so a blocked source ends its job the
//! same way an exhausted one does; [`RunSummary::listing_failures`] tells the
//! two apart for operators.
//!
//! Nothing runs concurrently. Every request goes through the fetcher's
//! politeness sleep, and each page's records are appended and flushed before
//! the next page is requested, so an interrupted run loses at most the page
//! in flight.

use crate::config::{AppConfig, PolitenessConfig};
use crate::error::{ConfigError, FetchError, PipelineError, SinkError};
use crate::models::{FetchKind, JobSpec, RunStatus};
use crate::scraper::http_client::{HttpClient, PageFetcher};
use crate::scraper::{AdapterRegistry, SiteAdapter, enricher, normalizer};
use crate::storage::ContactSink;
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Jobs used when the caller configures none.
pub fn default_jobs() -> Vec<JobSpec> {
    vec![
        JobSpec::new("paginegialle", "informatica", "milano", 3),
        JobSpec::new("paginegialle", "meccanica", "torino", 3),
        JobSpec::new("paginegialle", "elettronica", "roma", 3),
        JobSpec::new("europages", "software", "italia", 3),
        JobSpec::new("europages", "automazione industriale", "italia", 3),
        JobSpec::new("registro_imprese", "pmi tecnologia", "milano", 3),
        JobSpec::new("registro_imprese", "startup innovativa", "", 3),
    ]
}

/// A validated job paired with the adapter that serves it.
pub struct PlannedJob {
    pub spec: JobSpec,
    pub adapter: Arc<dyn SiteAdapter>,
}

/// What one listing page amounted to.
#[derive(Debug)]
pub enum PageOutcome {
    Items { persisted: usize, dropped: usize },
    Exhausted,
    FetchFailed(FetchError),
    Cancelled,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub persisted: usize,
    pub dropped: usize,
    pub jobs_attempted: usize,
    pub pages_fetched: usize,
    /// Listing pages treated as empty because the fetch failed.
    pub listing_failures: usize,
    /// Detail links that yielded nothing.
    pub details_missing: usize,
    pub cancelled: bool,
}

pub struct Pipeline {
    registry: AdapterRegistry,
    fetcher: Arc<dyn PageFetcher>,
    politeness: PolitenessConfig,
    status: watch::Sender<RunStatus>,
}

impl Pipeline {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = HttpClient::new(&config.scraper, config.politeness)
            .context("Failed to build scraper")?;
        Ok(Self::with_fetcher(
            AdapterRegistry::builtin(),
            Arc::new(client),
            config.politeness,
        ))
    }

    pub fn with_fetcher(
        registry: AdapterRegistry,
        fetcher: Arc<dyn PageFetcher>,
        politeness: PolitenessConfig,
    ) -> Self {
        let (status, _) = watch::channel(RunStatus::default());
        Self { registry, fetcher, politeness, status }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Latest published status.
    pub fn status(&self) -> RunStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<RunStatus> {
        self.status.subscribe()
    }

    /// Validate jobs and bind adapters. `None` means the default job list.
    /// Runs before any request is made.
    pub fn plan(&self, jobs: Option<Vec<JobSpec>>) -> Result<Vec<PlannedJob>, ConfigError> {
        self.politeness.validate()?;
        let jobs = jobs.unwrap_or_else(default_jobs);
        if jobs.is_empty() {
            return Err(ConfigError::NoJobs);
        }

        jobs.into_iter()
            .map(|spec| {
                if spec.max_pages == 0 {
                    return Err(ConfigError::ZeroPages { job: spec.to_string() });
                }
                let adapter = self.registry.resolve(&spec.source)?;
                Ok(PlannedJob { spec, adapter })
            })
            .collect()
    }

    /// Plan and execute. Only configuration and sink errors are returned;
    /// everything the remote sources do wrong ends up in the summary.
    pub async fn run(
        &self,
        jobs: Option<Vec<JobSpec>>,
        sink: &mut dyn ContactSink,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, PipelineError> {
        let plan = match self.plan(jobs) {
            Ok(plan) => plan,
            Err(e) => {
                self.publish_failure(&e.to_string());
                return Err(e.into());
            }
        };
        self.execute(&plan, sink, cancel).await.map_err(|e| {
            self.publish_failure(&e.to_string());
            e.into()
        })
    }

    async fn execute(
        &self,
        plan: &[PlannedJob],
        sink: &mut dyn ContactSink,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, SinkError> {
        let mut summary = RunSummary::default();
        self.status.send_replace(RunStatus {
            in_progress: true,
            jobs_total: plan.len(),
            started_at: Some(Utc::now()),
            ..Default::default()
        });

        for (i, job) in plan.iter().enumerate() {
            if i > 0 {
                let pause = self.politeness.between_jobs.sample();
                if !pause.is_zero() {
                    debug!("Pausing {:?} between jobs", pause);
                    tokio::select! {
                        _ = sleep(pause) => {}
                        _ = cancel.cancelled() => {}
                    }
                }
            }

            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            info!("=== Job {}/{}: {} ===", i + 1, plan.len(), job.spec);
            summary.jobs_attempted += 1;
            let before = summary.persisted;

            self.run_job(job, sink, cancel, &mut summary).await?;

            info!(
                "{}: {} records saved for '{}'",
                job.adapter.display_name(),
                summary.persisted - before,
                job.spec.sector
            );
            self.status.send_modify(|s| {
                s.count = summary.persisted;
                if !summary.cancelled {
                    s.jobs_completed = i + 1;
                }
            });

            if summary.cancelled {
                break;
            }
        }

        sink.flush()?;
        self.status.send_modify(|s| {
            s.in_progress = false;
            s.completed = !summary.cancelled;
            s.count = summary.persisted;
            s.finished_at = Some(Utc::now());
        });

        info!(
            "=== Done: {} persisted | {} dropped | {} jobs | {} pages ({} failed) | cancelled: {} ===",
            summary.persisted,
            summary.dropped,
            summary.jobs_attempted,
            summary.pages_fetched,
            summary.listing_failures,
            summary.cancelled,
        );
        Ok(summary)
    }

    async fn run_job(
        &self,
        job: &PlannedJob,
        sink: &mut dyn ContactSink,
        cancel: &CancellationToken,
        summary: &mut RunSummary,
    ) -> Result<(), SinkError> {
        for page in 1..=job.spec.max_pages {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                return Ok(());
            }

            match self.run_page(job, page, sink, cancel, summary).await? {
                PageOutcome::Items { persisted, dropped } => {
                    info!("  Page {}: {} saved, {} dropped", page, persisted, dropped);
                }
                PageOutcome::Exhausted => {
                    info!("  Page {}: no results, moving on", page);
                    return Ok(());
                }
                PageOutcome::FetchFailed(e) => {
                    warn!("  Page {}: treated as empty ({})", page, e);
                    return Ok(());
                }
                PageOutcome::Cancelled => {
                    summary.cancelled = true;
                    return Ok(());
                }
            }
        }
        debug!("{}: page limit {} reached", job.spec.source, job.spec.max_pages);
        Ok(())
    }

    async fn run_page(
        &self,
        job: &PlannedJob,
        page: u32,
        sink: &mut dyn ContactSink,
        cancel: &CancellationToken,
        summary: &mut RunSummary,
    ) -> Result<PageOutcome, SinkError> {
        let adapter = job.adapter.as_ref();
        let url = adapter.listing_url(&job.spec, page);
        summary.pages_fetched += 1;

        let listing = match self.fetcher.fetch(&url, FetchKind::Listing).await {
            Ok(fetched) => {
                debug!("{} -> HTTP {}, {} bytes", fetched.url, fetched.status, fetched.body.len());
                adapter.parse_listing(&fetched.body, &fetched.url)
            }
            Err(e) => {
                summary.listing_failures += 1;
                return Ok(PageOutcome::FetchFailed(e));
            }
        };
        if !listing.has_more {
            return Ok(PageOutcome::Exhausted);
        }

        let mut records = Vec::with_capacity(listing.items.len());
        let mut dropped = 0;
        for mut item in listing.items {
            if cancel.is_cancelled() {
                debug!("Cancelled mid-page; discarding {} pending records", records.len());
                return Ok(PageOutcome::Cancelled);
            }

            if let Some(detail_url) = item.detail_url.clone() {
                match enricher::enrich(self.fetcher.as_ref(), adapter, &detail_url).await {
                    Some(payload) => item.merge(payload),
                    None => summary.details_missing += 1,
                }
            }

            match normalizer::normalize(adapter, &item, &job.spec) {
                Some(contact) => records.push(contact),
                None => dropped += 1,
            }
        }

        for contact in &records {
            sink.append(contact)?;
        }
        sink.flush()?;

        summary.persisted += records.len();
        summary.dropped += dropped;
        Ok(PageOutcome::Items { persisted: records.len(), dropped })
    }

    fn publish_failure(&self, error: &str) {
        self.status.send_modify(|s| {
            s.in_progress = false;
            s.completed = false;
            s.error = Some(error.to_string());
            s.finished_at = Some(Utc::now());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalContact, CanonicalField, DetailPayload};
    use crate::scraper::http_client::FetchedPage;
    use crate::scraper::parsers::{self, CardLayout, FieldRule, ListingPage};
    use crate::storage::CsvSink;
    use crate::utils::path_segment;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ── Test source "X" ───────────────────────────────────────────────────────

    const CARDS: CardLayout = CardLayout {
        entry: ".item",
        name: FieldRule::text("name", ".name"),
        fields: &[FieldRule::text("tel", ".tel")],
        detail_link: Some("a.detail"),
    };

    struct SourceX;

    impl SiteAdapter for SourceX {
        fn id(&self) -> &str {
            "X"
        }
        fn display_name(&self) -> &str {
            "X"
        }
        fn listing_url(&self, job: &JobSpec, page: u32) -> String {
            format!(
                "https://x.test/{}/{}/{}",
                path_segment(&job.sector),
                path_segment(&job.locale),
                page
            )
        }
        fn parse_listing(&self, html: &str, page_url: &str) -> ListingPage {
            parsers::listing_or_empty("X", html, &CARDS, page_url)
        }
        fn parse_detail(&self, html: &str) -> Option<DetailPayload> {
            parsers::detail_or_absent("X", html, &[FieldRule::text("email", ".email")])
        }
        fn field_keys(&self, field: CanonicalField) -> &'static [&'static str] {
            match field {
                CanonicalField::Name => &["name"],
                CanonicalField::Phone => &["tel"],
                CanonicalField::Email => &["email"],
                _ => &[],
            }
        }
    }

    // ── Scripted fetcher ──────────────────────────────────────────────────────

    #[derive(Default)]
    struct Scripted {
        pages: HashMap<String, String>,
        /// Served for any listing URL not in `pages`.
        any_listing: Option<String>,
        /// Cancelled on the first detail fetch.
        cancel_on_detail: Option<CancellationToken>,
        calls: Mutex<Vec<(String, FetchKind)>>,
    }

    impl Scripted {
        fn page(mut self, url: &str, body: String) -> Self {
            self.pages.insert(url.to_string(), body);
            self
        }

        fn calls(&self, kind: FetchKind) -> usize {
            self.calls.lock().unwrap().iter().filter(|(_, k)| *k == kind).count()
        }
    }

    #[async_trait]
    impl PageFetcher for Scripted {
        async fn fetch(&self, url: &str, kind: FetchKind) -> Result<FetchedPage, FetchError> {
            self.calls.lock().unwrap().push((url.to_string(), kind));
            if kind == FetchKind::Detail {
                if let Some(token) = &self.cancel_on_detail {
                    token.cancel();
                }
            }
            let body = self.pages.get(url).cloned().or_else(|| match kind {
                FetchKind::Listing => self.any_listing.clone(),
                FetchKind::Detail => None,
            });
            match body {
                Some(body) => Ok(FetchedPage { url: url.to_string(), status: 200, body }),
                None => Err(FetchError::Status { url: url.to_string(), status: 404 }),
            }
        }
    }

    fn cards(names: &[&str]) -> String {
        names
            .iter()
            .map(|n| format!(r#"<div class="item"><span class="name">{n}</span><span class="tel">02 1234567</span></div>"#))
            .collect()
    }

    fn pipeline(fetcher: Arc<Scripted>) -> Pipeline {
        let mut registry = AdapterRegistry::default();
        registry.register(Arc::new(SourceX));
        Pipeline::with_fetcher(registry, fetcher, PolitenessConfig::none())
    }

    fn job_x(max_pages: u32) -> Vec<JobSpec> {
        vec![JobSpec::new("X", "Informatica", "Milano", max_pages)]
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn five_items_then_empty_page() {
        let fetcher = Arc::new(
            Scripted::default()
                .page("https://x.test/Informatica/Milano/1", cards(&["A", "B", "C", "D", "E"]))
                .page("https://x.test/Informatica/Milano/2", String::new()),
        );
        let pipeline = pipeline(fetcher.clone());
        let mut sink: Vec<CanonicalContact> = Vec::new();

        let summary = pipeline
            .run(Some(job_x(2)), &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(sink.len(), 5);
        assert!(sink.iter().all(|c| c.source == "X" && c.sector == "Informatica"));
        assert_eq!(fetcher.calls(FetchKind::Listing), 2);
        assert_eq!(fetcher.calls(FetchKind::Detail), 0);
        assert_eq!(summary.persisted, 5);
        assert_eq!(summary.jobs_attempted, 1);
    }

    #[tokio::test]
    async fn page_limit_caps_listing_fetches() {
        let fetcher = Arc::new(Scripted { any_listing: Some(cards(&["A"])), ..Default::default() });
        let pipeline = pipeline(fetcher.clone());
        let mut sink: Vec<CanonicalContact> = Vec::new();

        let summary = pipeline
            .run(Some(job_x(3)), &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(fetcher.calls(FetchKind::Listing), 3);
        assert_eq!(summary.pages_fetched, 3);
        assert_eq!(sink.len(), 3);
    }

    #[tokio::test]
    async fn nameless_records_are_dropped_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contatti.csv");
        let fetcher = Arc::new(
            Scripted::default().page("https://x.test/Informatica/Milano/1", cards(&["A", " ", "C", "&nbsp;", "E"])),
        );
        let pipeline = pipeline(fetcher);
        let mut sink = CsvSink::open(&path).unwrap();

        let summary = pipeline
            .run(Some(job_x(2)), &mut sink, &CancellationToken::new())
            .await
            .unwrap();
        drop(sink);

        assert_eq!(summary.persisted, 3);
        assert_eq!(summary.dropped, 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4, "header + 3 rows");
    }

    #[tokio::test]
    async fn detail_pages_enrich_and_failures_keep_the_item() {
        let listing = r#"
            <div class="item"><span class="name">Alfa</span><a class="detail" href="/alfa">+</a></div>
            <div class="item"><span class="name">Beta</span><a class="detail" href="/beta">+</a></div>
        "#;
        let fetcher = Arc::new(
            Scripted::default()
                .page("https://x.test/Informatica/Milano/1", listing.to_string())
                .page(
                    "https://x.test/alfa",
                    r#"<p class="email">info@alfa.it</p><p>Chiamaci al +39 02 1234567</p>"#.to_string(),
                ),
        );
        let pipeline = pipeline(fetcher.clone());
        let mut sink: Vec<CanonicalContact> = Vec::new();

        let summary = pipeline
            .run(Some(job_x(1)), &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(fetcher.calls(FetchKind::Detail), 2);
        assert_eq!(summary.details_missing, 1);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].email, "info@alfa.it");
        assert_eq!(sink[0].phone, "+39 02 1234567");
        assert_eq!(sink[1].name, "Beta");
        assert_eq!(sink[1].email, "");
    }

    #[tokio::test]
    async fn failed_listing_ends_the_job_but_not_the_run() {
        let fetcher = Arc::new(
            Scripted::default().page("https://x.test/Meccanica/Torino/1", cards(&["A", "B"])),
        );
        let pipeline = pipeline(fetcher.clone());
        let mut sink: Vec<CanonicalContact> = Vec::new();
        let jobs = vec![
            JobSpec::new("X", "Informatica", "Milano", 3),
            JobSpec::new("X", "Meccanica", "Torino", 1),
        ];

        let summary = pipeline
            .run(Some(jobs), &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.jobs_attempted, 2);
        assert_eq!(summary.listing_failures, 1);
        assert_eq!(summary.persisted, 2);
        assert_eq!(fetcher.calls(FetchKind::Listing), 2);

        let status = pipeline.status();
        assert!(status.completed);
        assert!(!status.in_progress);
        assert_eq!(status.count, 2);
        assert_eq!(status.jobs_completed, 2);
        assert_eq!(status.error, None);
    }

    #[tokio::test]
    async fn unknown_source_fails_before_any_request() {
        let fetcher = Arc::new(Scripted::default());
        let pipeline = pipeline(fetcher.clone());
        let mut sink: Vec<CanonicalContact> = Vec::new();
        let jobs = vec![
            JobSpec::new("X", "Informatica", "Milano", 1),
            JobSpec::new("kompass", "software", "", 1),
        ];

        let err = pipeline
            .run(Some(jobs), &mut sink, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Config(ConfigError::UnknownSource(ref s)) if s == "kompass"));
        assert_eq!(fetcher.calls.lock().unwrap().len(), 0);
        assert_eq!(pipeline.status().error.as_deref(), Some("unknown source 'kompass'"));
    }

    #[test]
    fn plan_rejects_empty_and_zero_page_jobs() {
        let pipeline = pipeline(Arc::new(Scripted::default()));
        assert_eq!(pipeline.plan(Some(vec![])).err(), Some(ConfigError::NoJobs));
        assert!(matches!(
            pipeline.plan(Some(job_x(0))).err(),
            Some(ConfigError::ZeroPages { .. })
        ));
    }

    #[test]
    fn default_jobs_resolve_against_builtin_sources() {
        let pipeline = Pipeline::with_fetcher(
            AdapterRegistry::builtin(),
            Arc::new(Scripted::default()),
            PolitenessConfig::none(),
        );
        let plan = pipeline.plan(None).unwrap();
        assert_eq!(plan.len(), 7);
        assert_eq!(plan[0].adapter.id(), "paginegialle");
        assert_eq!(plan[6].spec.sector, "startup innovativa");
    }

    #[tokio::test]
    async fn cancelled_before_start_fetches_nothing() {
        let fetcher = Arc::new(Scripted { any_listing: Some(cards(&["A"])), ..Default::default() });
        let pipeline = pipeline(fetcher.clone());
        let mut sink: Vec<CanonicalContact> = Vec::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = pipeline.run(Some(job_x(3)), &mut sink, &cancel).await.unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.jobs_attempted, 0);
        assert_eq!(fetcher.calls.lock().unwrap().len(), 0);
        assert!(sink.is_empty());
        assert!(!pipeline.status().completed);
    }

    #[tokio::test]
    async fn cancel_mid_page_writes_no_partial_page() {
        let cancel = CancellationToken::new();
        let listing = r#"
            <div class="item"><span class="name">Alfa</span><a class="detail" href="/alfa">+</a></div>
            <div class="item"><span class="name">Beta</span></div>
        "#;
        let fetcher = Arc::new(Scripted {
            cancel_on_detail: Some(cancel.clone()),
            ..Scripted::default().page("https://x.test/Informatica/Milano/1", listing.to_string())
        });
        let pipeline = pipeline(fetcher.clone());
        let mut sink: Vec<CanonicalContact> = Vec::new();

        let summary = pipeline.run(Some(job_x(3)), &mut sink, &cancel).await.unwrap();

        assert!(summary.cancelled);
        assert!(sink.is_empty());
        assert_eq!(summary.persisted, 0);
        assert_eq!(fetcher.calls(FetchKind::Listing), 1);
    }

    #[tokio::test]
    async fn cancel_between_jobs_does_not_start_the_next_one() {
        let cancel = CancellationToken::new();
        let fetcher = Arc::new(Scripted {
            cancel_on_detail: Some(cancel.clone()),
            ..Scripted::default().page(
                "https://x.test/Informatica/Milano/1",
                r#"<div class="item"><span class="name">Alfa</span><a class="detail" href="/alfa">+</a></div>"#
                    .to_string(),
            )
        });
        let pipeline = pipeline(fetcher.clone());
        let mut sink: Vec<CanonicalContact> = Vec::new();
        let jobs = vec![
            JobSpec::new("X", "Informatica", "Milano", 1),
            JobSpec::new("X", "Meccanica", "Torino", 1),
        ];

        let summary = pipeline.run(Some(jobs), &mut sink, &cancel).await.unwrap();

        // The token fires during the first job's last detail fetch; that page
        // still completes, the second job never starts.
        assert_eq!(sink.len(), 1);
        assert!(summary.cancelled);
        assert_eq!(summary.jobs_attempted, 1);
        assert_eq!(fetcher.calls(FetchKind::Listing), 1);
        assert_eq!(pipeline.status().jobs_completed, 1);
        assert!(!pipeline.status().completed);
    }

    struct BrokenDisk;

    impl ContactSink for BrokenDisk {
        fn append(&mut self, _contact: &CanonicalContact) -> Result<(), SinkError> {
            Err(SinkError::Flush(std::io::Error::other("disk full")))
        }

        fn flush(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn sink_failure_aborts_the_run() {
        let fetcher = Arc::new(Scripted { any_listing: Some(cards(&["A", "B"])), ..Default::default() });
        let pipeline = pipeline(fetcher.clone());
        let jobs = vec![
            JobSpec::new("X", "Informatica", "Milano", 3),
            JobSpec::new("X", "Meccanica", "Torino", 3),
        ];

        let err = pipeline
            .run(Some(jobs), &mut BrokenDisk, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Sink(SinkError::Flush(_))));
        assert_eq!(fetcher.calls(FetchKind::Listing), 1);

        let status = pipeline.status();
        assert!(!status.in_progress);
        assert!(!status.completed);
        assert_eq!(status.error.as_deref(), Some("cannot flush sink: disk full"));
        assert!(status.finished_at.is_some());
    }

    #[tokio::test]
    async fn status_subscribers_see_the_final_state() {
        let fetcher = Arc::new(
            Scripted::default().page("https://x.test/Informatica/Milano/1", cards(&["A"])),
        );
        let pipeline = pipeline(fetcher);
        let mut rx = pipeline.subscribe_status();
        let mut sink: Vec<CanonicalContact> = Vec::new();

        pipeline
            .run(Some(job_x(1)), &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        let status = rx.borrow_and_update().clone();
        assert!(status.completed);
        assert_eq!(status.count, 1);
        assert_eq!(status.jobs_total, 1);
        assert!(status.started_at.is_some() && status.finished_at.is_some());
    }
}
