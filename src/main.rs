//! CLI entry point for the wallgrab tool.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use wallgrab_core::{
    AssetResolver, Crawler, DownloadEngine, HttpClient, SearchFilter, resolve_all,
};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level: RUST_LOG env var > verbose flag > default (info)
    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    // A Ctrl-C anywhere in the pipeline exits cleanly at the next await point
    tokio::select! {
        result = run(args) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted by user, exiting");
            Ok(())
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let filter = build_filter(&args);
    let pool = bounded_pool_size(args.pool as usize);

    tokio::fs::create_dir_all(&args.directory)
        .await
        .with_context(|| {
            format!(
                "failed to create destination directory {}",
                args.directory.display()
            )
        })?;

    let client = HttpClient::new();

    // Stage 1: paginated discovery
    let crawler = Crawler::new(client.clone());
    info!("retrieving wallpaper links, this may take a few minutes...");
    let crawl = crawler.crawl(&filter).await?;

    if crawl.is_empty() {
        info!("no wallpapers found for the specified search/options, exiting");
        return Ok(());
    }
    info!(
        links = crawl.links.len(),
        outcome = ?crawl.outcome,
        "discovery complete"
    );

    // Stage 2: sequential per-item resolution, preserving discovery order
    let resolver = AssetResolver::new(client.clone());
    let locators = resolve_all(&resolver, &crawl.links).await;

    if locators.is_empty() {
        info!("no downloadable assets resolved, exiting");
        return Ok(());
    }

    // Stage 3: concurrent persistence
    let engine = DownloadEngine::new(pool)?;
    let stats = engine.persist(locators, &client, &args.directory).await;

    info!(
        completed = stats.completed(),
        failed = stats.failed(),
        total = stats.total(),
        directory = %args.directory.display(),
        "done"
    );
    Ok(())
}

fn build_filter(args: &Args) -> SearchFilter {
    let mut filter = SearchFilter::new(&args.query);
    filter.resolution = args.resolution;
    filter.exact = args.exact;
    filter.safety = args.safety;
    filter.limit = args.limit.map(|l| l as usize);
    filter
}

/// Caps the requested pool size at the host's available parallelism.
fn bounded_pool_size(requested: usize) -> usize {
    let available = std::thread::available_parallelism().map_or(1, std::num::NonZero::get);
    if requested > available {
        warn!(
            requested,
            available, "pool size exceeds available parallelism, capping"
        );
        available
    } else {
        requested
    }
}
