use crate::target::Target;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlOutcome {
    /// Every reachable page was processed.
    Completed,
    /// Stopped early by an external cancellation.
    Cancelled,
    /// Every worker exited before the frontier drained.
    Aborted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub duplicates_skipped: usize,
    pub links_rejected: usize,
    pub elapsed: Duration,
}

/// Counters shared by the workers while a crawl runs.
#[derive(Debug, Default)]
pub(crate) struct CrawlCounters {
    pub pages_fetched: AtomicUsize,
    pub fetch_failures: AtomicUsize,
    pub duplicates_skipped: AtomicUsize,
    pub links_rejected: AtomicUsize,
}

impl CrawlCounters {
    pub fn bump(counter: &AtomicUsize, by: usize) {
        if by > 0 {
            counter.fetch_add(by, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self, elapsed: Duration) -> CrawlStats {
        CrawlStats {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            links_rejected: self.links_rejected.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

/// Everything a finished crawl admitted, in sorted order.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub seed: Target,
    pub scope: String,
    pub outcome: CrawlOutcome,
    pub targets: Vec<Target>,
    pub stats: CrawlStats,
}

impl CrawlResult {
    pub fn urls(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.as_str().to_string()).collect()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.targets.iter().any(|t| t.as_str() == url)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == CrawlOutcome::Completed
    }
}
