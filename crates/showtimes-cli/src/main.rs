//! `showtimes`: scrape indie theater listings into a local SQLite store.
//!
//! Reads `config.toml` (or the path given with `--config`) layered with
//! `SHOWTIMES_*` environment variables.
//!
//! # Usage
//!
//! ```text
//! showtimes run                          # every registered source
//! showtimes run --source laemmle --json  # one source, JSON summary
//! showtimes summary --limit 20
//! showtimes sources
//! ```

mod http;
mod report;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use showtimes_core::store::ShowtimeStore;
use showtimes_normalize::theater_today;
use showtimes_reconcile::{Engine, ReconcileOptions};
use showtimes_sources::{Registry, ScrapeContext};
use showtimes_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{http::HttpFetcher, settings::AppConfig};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "showtimes", author, version, about = "Indie and arthouse showtime aggregator")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Scrape sources and reconcile their listings into the store.
  Run {
    /// Source id to run; repeatable. Runs every source when omitted.
    #[arg(long = "source", value_name = "ID")]
    sources: Vec<String>,

    /// Reference date (YYYY-MM-DD) instead of today in the theaters' zone.
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Show store counts and the next upcoming screenings.
  Summary {
    #[arg(long, default_value_t = 10)]
    limit: usize,
  },

  /// List registered sources and their venues.
  Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;
  let registry = Registry::builtin(&cfg.builtin_options()).context("failed to build source registry")?;

  match cli.command {
    Command::Run { sources, today, json } => run(&cfg, &registry, &sources, today, json).await,
    Command::Summary { limit } => summary(&cfg, limit).await,
    Command::Sources => {
      print!("{}", report::source_list(&registry));
      Ok(())
    }
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn run(
  cfg:      &AppConfig,
  registry: &Registry,
  sources:  &[String],
  today:    Option<NaiveDate>,
  json:     bool,
) -> anyhow::Result<()> {
  let store = open_store(cfg).await?;
  let fetcher = HttpFetcher::new(Duration::from_secs(cfg.fetch_timeout_secs), &cfg.user_agent)?;
  let options = ReconcileOptions { default_format: cfg.default_format };
  let ctx = ScrapeContext { today: today.unwrap_or_else(|| theater_today(Utc::now())) };

  tracing::info!(today = %ctx.today, store = ?cfg.store_path, "starting run");
  let summary = Engine::new(&store, registry, &fetcher, options)
    .run_batch(sources, &ctx)
    .await;

  if json {
    let out = serde_json::to_string_pretty(&summary).context("failed to serialise run summary")?;
    println!("{out}");
  } else {
    print!("{}", report::run_table(&summary));
  }
  Ok(())
}

async fn summary(cfg: &AppConfig, limit: usize) -> anyhow::Result<()> {
  let store = open_store(cfg).await?;
  let counts = store.counts().await.context("failed to count rows")?;
  let upcoming = store
    .upcoming_screenings(Utc::now(), limit)
    .await
    .context("failed to list upcoming screenings")?;
  print!("{}", report::store_summary(&counts, &upcoming));
  Ok(())
}

async fn open_store(cfg: &AppConfig) -> anyhow::Result<SqliteStore> {
  let path = &cfg.store_path;
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("failed to create {parent:?}"))?;
  }
  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}
