use crate::error::{CrawlError, Result};
use std::num::NonZeroUsize;

/// Frontier capacity used unless overridden. Large enough that a burst of
/// links from one page does not stall workers against a full queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str =
    concat!("hostcrawl/", env!("CARGO_PKG_VERSION"), " (https://github.com/trapdoorsec/hostcrawl)");

/// One worker per available hardware thread.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    pub workers: usize,
    pub queue_capacity: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CrawlError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(CrawlError::InvalidConfig(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(CrawlError::InvalidConfig(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}
