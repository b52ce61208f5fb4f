mod config;
mod error;
mod models;
mod pipeline;
mod scraper;
mod storage;
mod utils;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;
use crate::models::JobSpec;
use crate::pipeline::{Pipeline, default_jobs};
use crate::scraper::AdapterRegistry;
use crate::storage::{CsvSink, sink_stats};

#[derive(Parser)]
#[command(name = "pmi-scraper", about = "Italian SME contact collector", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the configured sources and append contacts to the CSV sink
    Crawl(CrawlArgs),

    /// Show statistics for an existing sink
    Stats {
        /// Sink to read (default: storage.output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the built-in sources
    Sources,
}

#[derive(Args)]
struct CrawlArgs {
    /// Restrict to these sources (repeatable)
    #[arg(short, long)]
    source: Vec<String>,

    /// Search a single sector instead of the configured jobs
    #[arg(long)]
    sector: Option<String>,

    /// City for --sector; sources searched by country ignore it
    #[arg(long, requires = "sector")]
    locale: Option<String>,

    /// Override max_pages for every job
    #[arg(short, long)]
    pages: Option<u32>,

    /// Sink path (default: storage.output_path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the final run status as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "pmi_scraper=info,warn",
        1 => "pmi_scraper=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Crawl(args) => crawl(config, args).await?,

        Command::Stats { output } => {
            let path = output.unwrap_or(config.storage.output_path);
            let stats = sink_stats(&path)?;
            println!("─────────────────────────────────");
            println!("  PMI contacts: {}", path.display());
            println!("─────────────────────────────────");
            println!("  Rows      : {}", stats.rows);
            println!("  Email     : {}", stats.with_email);
            println!("  Phone     : {}", stats.with_phone);
            println!("  Website   : {}", stats.with_website);
            for (source, rows) in &stats.by_source {
                println!("  {:<10}: {}", source, rows);
            }
            println!("─────────────────────────────────");
        }

        Command::Sources => {
            for adapter in AdapterRegistry::builtin().adapters() {
                println!("  {:<18} {}", adapter.id(), adapter.display_name());
            }
        }
    }

    Ok(())
}

async fn crawl(config: AppConfig, args: CrawlArgs) -> Result<()> {
    let _t = utils::Timer::start("Crawl");
    let pipeline = Pipeline::new(&config)?;
    let jobs = select_jobs(&config, pipeline.registry(), &args);

    // Configuration problems surface before the sink is touched.
    pipeline.plan(Some(jobs.clone()))?;

    let path = args.output.unwrap_or(config.storage.output_path);
    let mut sink = CsvSink::open(&path)?;
    if !sink.created() {
        info!("Appending to existing sink {:?}", sink.path());
    }

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if handle_interrupts(tokio::signal::ctrl_c, on_ctrl_c).await {
            warn!("Interrupted again, exiting now");
            std::process::exit(130);
        }
    });

    let mut status = pipeline.subscribe_status();
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let s = status.borrow_and_update().clone();
            debug!(
                "status: {}/{} jobs, {} records, in progress: {}",
                s.jobs_completed, s.jobs_total, s.count, s.in_progress
            );
        }
    });

    let summary = pipeline.run(Some(jobs), &mut sink, &cancel).await?;
    info!(
        "Done: {} saved to {:?}, {} dropped, {} listing failures",
        sink.rows(),
        sink.path(),
        summary.dropped,
        summary.listing_failures
    );

    if args.json {
        let status = serde_json::to_string_pretty(&pipeline.status())
            .context("Failed to serialise run status")?;
        println!("{}", status);
    }
    Ok(())
}

/// Cancel on the first interrupt. Returns `true` once a second one arrives,
/// `false` if interrupts cannot be received at all.
async fn handle_interrupts<F, Fut>(mut next_interrupt: F, cancel: CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if next_interrupt().await.is_err() {
        return false;
    }
    warn!("Interrupted, stopping after the current request (Ctrl-C again to quit)");
    cancel.cancel();
    next_interrupt().await.is_ok()
}

/// Jobs for this run: a single sector across the chosen sources, or the
/// configured list (defaults when empty) filtered by `--source`.
fn select_jobs(config: &AppConfig, registry: &AdapterRegistry, args: &CrawlArgs) -> Vec<JobSpec> {
    let pages = args.pages.unwrap_or(config.pipeline.default_pages);

    if let Some(sector) = &args.sector {
        let sources: Vec<String> = if args.source.is_empty() {
            registry.adapters().map(|a| a.id().to_string()).collect()
        } else {
            args.source.clone()
        };
        let city = args.locale.as_deref().unwrap_or("");
        return sources
            .iter()
            .map(|source| {
                let locale = match registry.resolve(source) {
                    Ok(adapter) if !adapter.takes_city_locale() => "",
                    _ => city,
                };
                JobSpec::new(source, sector, locale, pages)
            })
            .collect();
    }

    let mut jobs = if config.pipeline.jobs.is_empty() {
        default_jobs()
    } else {
        config.pipeline.jobs.clone()
    };

    if !args.source.is_empty() {
        // Unknown names are kept so planning reports them.
        let canonical = |s: &str| {
            registry
                .resolve(s)
                .map(|a| a.id().to_string())
                .unwrap_or_else(|_| s.to_string())
        };
        let wanted: Vec<String> = args.source.iter().map(|s| canonical(s)).collect();
        jobs.retain(|job| wanted.contains(&canonical(&job.source)));
        jobs.extend(
            wanted
                .iter()
                .filter(|w| registry.resolve(w).is_err())
                .map(|w| JobSpec::new(w, "", "", pages)),
        );
    }

    if let Some(p) = args.pages {
        for job in &mut jobs {
            job.max_pages = p;
        }
    }
    jobs
}
