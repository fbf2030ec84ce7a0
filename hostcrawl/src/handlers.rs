use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use hostcrawl_core::crawl::{CrawlOptions, execute_crawl};
use hostcrawl_core::report::{generate_crawl_report, save_urls_to_file};
use hostcrawl_scanner::CrawlOutcome;
use hostcrawl_scanner::config::default_workers;
use std::path::PathBuf;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Log to stderr, filtered by `RUST_LOG` (default: warnings only).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed (tests); that one wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn print_banner() {
    println!(
        "{} {}",
        "hostcrawl".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

/// Expand `~` and environment variables in a user-supplied output path
pub fn resolve_output_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Could not expand output path '{}'", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Build crawl options from the `crawl` subcommand arguments
pub fn crawl_options_from_args(args: &ArgMatches) -> Result<CrawlOptions> {
    let url = args
        .get_one::<Url>("url")
        .context("--url is required")?;

    let mut options = CrawlOptions::new(url.as_str());
    options.workers = args
        .get_one::<usize>("workers")
        .copied()
        .unwrap_or_else(default_workers);
    if let Some(capacity) = args.get_one::<usize>("queue-capacity") {
        options.queue_capacity = *capacity;
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        options.timeout_secs = *timeout;
    }
    Ok(options)
}

pub async fn handle_crawl(args: &ArgMatches) -> Result<()> {
    init_logging();

    let quiet = args.get_flag("quiet");
    let no_report = args.get_flag("no-report");
    let output = args
        .get_one::<String>("output")
        .map(|raw| resolve_output_path(raw))
        .transpose()?;

    let mut options = crawl_options_from_args(args)?;
    options.show_progress_bars = !quiet;

    if !quiet {
        let host = Url::parse(&options.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| options.url.clone());
        println!();
        print_divider();
        println!("{} {}", "  CRAWLING".bright_white().bold(), host.bright_white());
        print_divider();
        println!("{} Workers: {}", "→".blue(), options.workers.to_string().cyan());
        println!(
            "{} Queue capacity: {}",
            "→".blue(),
            options.queue_capacity.to_string().cyan()
        );
        println!(
            "{} Timeout: {}s",
            "→".blue(),
            options.timeout_secs.to_string().cyan()
        );
        println!();
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping crawl");
            ctrl_c.cancel();
        }
    });

    let start = Instant::now();
    let result = execute_crawl(options, cancel, None)
        .await
        .context("Crawl failed")?;

    match result.outcome {
        CrawlOutcome::Completed => {}
        CrawlOutcome::Cancelled => println!(
            "{} Crawl interrupted, results are partial",
            "⚠".yellow().bold()
        ),
        CrawlOutcome::Aborted => println!(
            "{} All workers stopped early, results are partial",
            "⚠".yellow().bold()
        ),
    }

    if !no_report && !quiet {
        println!();
        print!("{}", generate_crawl_report(&result));
    }

    println!(
        "{} Got {} results",
        "✓".green().bold(),
        result.len().to_string().bright_white()
    );

    if let Some(path) = output {
        save_urls_to_file(&result.urls(), &path)
            .with_context(|| format!("Failed to save URLs to {}", path.display()))?;
        println!(
            "{} URLs saved to {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    println!(
        "{} Processing time: {:.2?}",
        "ℹ".blue(),
        start.elapsed()
    );
    Ok(())
}
