use hostcrawl_scanner::config::{self, CrawlConfig};
use hostcrawl_scanner::{CrawlError, CrawlResult, Crawler, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub workers: usize,
    pub queue_capacity: usize,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            workers: config::default_workers(),
            queue_capacity: config::DEFAULT_QUEUE_CAPACITY,
            timeout_secs: config::DEFAULT_TIMEOUT_SECS,
            show_progress_bars: false,
        }
    }

    fn to_config(&self) -> CrawlConfig {
        CrawlConfig::new()
            .with_workers(self.workers)
            .with_queue_capacity(self.queue_capacity)
            .with_timeout(self.timeout_secs)
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Execute a crawl with the given options
///
/// Stops early, returning what was collected, when `cancel` fires.
pub async fn execute_crawl(
    options: CrawlOptions,
    cancel: CancellationToken,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlResult, CrawlError> {
    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let worker_progress: ProgressCallback = {
        let pb = progress_bar.clone();
        let count = processed_count.clone();
        Arc::new(move |worker_id: usize, url: String| {
            let processed = count.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb {
                pb.set_message(format!(
                    "Crawling... {} pages fetched (worker {}: {})",
                    processed,
                    worker_id,
                    extract_url_path(&url)
                ));
            }
            if let Some(ref callback) = progress_callback {
                callback(format!("Worker {}: {}", worker_id, url));
            }
        })
    };

    let crawler = Crawler::from_config(options.to_config()).with_progress_callback(worker_progress);
    let outcome = crawler.crawl_with_cancellation(&options.url, cancel).await;

    if let Some(pb) = progress_bar {
        match outcome {
            Ok(ref result) => pb.finish_with_message(format!(
                "Crawl {}! {} pages found",
                if result.is_complete() { "complete" } else { "stopped" },
                result.len()
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    outcome
}
