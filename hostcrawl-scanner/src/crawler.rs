use crate::config::CrawlConfig;
use crate::error::{CrawlError, Result};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::frontier::Frontier;
use crate::normalize::Normalizer;
use crate::quiescence::QuiescenceTracker;
use crate::result::{CrawlCounters, CrawlOutcome, CrawlResult};
use crate::target::{Scope, Target};
use crate::visited::VisitedSet;
use crate::worker::{ProgressCallback, Worker, WorkerContext};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

/// Crawls every page reachable from a seed without leaving the seed's host.
///
/// A fixed pool of workers shares one bounded frontier. The crawl ends when
/// the frontier is empty and no worker holds a target, at which point the
/// pool is cancelled and joined and the visited set becomes the result.
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Option<Arc<dyn PageFetcher>>,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Self {
        Self::from_config(CrawlConfig::default())
    }

    pub fn from_config(config: CrawlConfig) -> Self {
        Self {
            config,
            fetcher: None,
            progress_callback: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Replaces the default HTTP fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub async fn crawl(&self, seed: &str) -> Result<CrawlResult> {
        self.crawl_with_cancellation(seed, CancellationToken::new())
            .await
    }

    /// Like [`Crawler::crawl`], but stops early when `shutdown` fires and
    /// returns what was collected so far.
    pub async fn crawl_with_cancellation(
        &self,
        seed: &str,
        shutdown: CancellationToken,
    ) -> Result<CrawlResult> {
        self.config.validate()?;

        let (seed, scope) = parse_seed(seed)?;
        let fetcher: Arc<dyn PageFetcher> = match self.fetcher {
            Some(ref fetcher) => fetcher.clone(),
            None => Arc::new(HttpFetcher::new(&self.config)?),
        };

        info!(
            "Starting crawl of {} with {} workers",
            seed, self.config.workers
        );
        let started = Instant::now();

        let tracker = Arc::new(QuiescenceTracker::new());
        let frontier = Arc::new(Frontier::new(self.config.queue_capacity, tracker.clone())?);
        let visited = Arc::new(VisitedSet::new());
        let counters = Arc::new(CrawlCounters::default());
        let stop = shutdown.child_token();

        let finish = |outcome| CrawlResult {
            seed: seed.clone(),
            scope: scope.to_string(),
            outcome,
            targets: visited.snapshot(),
            stats: counters.snapshot(started.elapsed()),
        };

        // The seed goes in before any worker exists, otherwise the tracker
        // reads as idle and the crawl would end before it began.
        if !frontier.push(seed.clone(), &stop).await {
            info!("Crawl of {} cancelled before it started", seed);
            return Ok(finish(CrawlOutcome::Cancelled));
        }

        let ctx = WorkerContext {
            frontier,
            visited: visited.clone(),
            normalizer: Arc::new(Normalizer::new(scope.clone())),
            fetcher,
            counters: counters.clone(),
            progress: self.progress_callback.clone(),
            cancel: stop.clone(),
        };

        let mut workers = JoinSet::new();
        for worker_id in 0..self.config.workers {
            workers.spawn(Worker::new(worker_id, ctx.clone()).run());
        }
        drop(ctx);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = tracker.wait_idle() => break CrawlOutcome::Completed,
                _ = shutdown.cancelled() => break CrawlOutcome::Cancelled,
                joined = workers.join_next() => match joined {
                    Some(Ok(())) => warn!("Worker exited before the crawl finished"),
                    Some(Err(e)) => error!("Worker task failed: {}", e),
                    None => break CrawlOutcome::Aborted,
                },
            }
        };

        debug!("Stopping workers ({:?})", outcome);
        stop.cancel();
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!("Worker task failed: {}", e);
            }
        }

        let result = finish(outcome);
        info!(
            "Crawl complete. Visited {} pages in {:?}",
            result.len(),
            result.stats.elapsed
        );
        Ok(result)
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_seed(seed: &str) -> Result<(Target, Scope)> {
    let invalid = |reason: String| CrawlError::InvalidSeedUrl {
        url: seed.to_string(),
        reason,
    };

    let url = Url::parse(seed).map_err(|e| invalid(e.to_string()))?;
    let scope = Scope::from_url(&url).ok_or_else(|| invalid("URL has no host".to_string()))?;
    Ok((Target::new(url), scope))
}
