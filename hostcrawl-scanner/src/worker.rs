use crate::fetch::PageFetcher;
use crate::frontier::{Backlog, Frontier};
use crate::normalize::Normalizer;
use crate::result::CrawlCounters;
use crate::target::Target;
use crate::visited::VisitedSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Called with `(worker_id, url)` just before a worker fetches a page.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Everything a worker shares with the rest of the pool.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub frontier: Arc<Frontier>,
    pub visited: Arc<VisitedSet>,
    pub normalizer: Arc<Normalizer>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub counters: Arc<CrawlCounters>,
    pub progress: Option<ProgressCallback>,
    pub cancel: CancellationToken,
}

pub(crate) struct Worker {
    id: usize,
    ctx: WorkerContext,
}

impl Worker {
    pub fn new(id: usize, ctx: WorkerContext) -> Self {
        Self { id, ctx }
    }

    /// Pulls targets until the pool is cancelled. A worker never decides on
    /// its own that the crawl is over.
    ///
    /// Discoveries that do not fit in the frontier stay in the worker's
    /// backlog. While the backlog holds anything the worker works through it
    /// instead of waiting on the queue.
    pub async fn run(self) {
        debug!("Worker {} started", self.id);
        let mut backlog = self.ctx.frontier.backlog();

        while !self.ctx.cancel.is_cancelled() {
            self.ctx.frontier.flush(&mut backlog);
            let checkout = match backlog.take() {
                Some(checkout) => checkout,
                None => match self.ctx.frontier.pop(&self.ctx.cancel).await {
                    Some(checkout) => checkout,
                    None => break,
                },
            };
            self.process(checkout.target(), &mut backlog).await;
        }

        debug!("Worker {} exiting", self.id);
    }

    async fn process(&self, target: &Target, backlog: &mut Backlog) {
        let ctx = &self.ctx;

        if ctx.visited.try_claim(target) {
            trace!("[Worker {}] {} already claimed", self.id, target);
            CrawlCounters::bump(&ctx.counters.duplicates_skipped, 1);
            return;
        }

        if let Some(ref callback) = ctx.progress {
            callback(self.id, target.to_string());
        }

        let links = match ctx.fetcher.fetch(target).await {
            Ok(links) => {
                CrawlCounters::bump(&ctx.counters.pages_fetched, 1);
                links
            }
            Err(e) => {
                CrawlCounters::bump(&ctx.counters.fetch_failures, 1);
                warn!("Crawl error for {}: {}", target, e);
                return;
            }
        };

        let filtered = ctx.normalizer.filter_links(target, links, &ctx.visited);
        CrawlCounters::bump(&ctx.counters.links_rejected, filtered.rejected);
        debug!(
            "[Worker {}] {} yielded {} new targets ({} rejected, {} already seen)",
            self.id,
            target,
            filtered.targets.len(),
            filtered.rejected,
            filtered.already_seen
        );

        for next in filtered.targets {
            ctx.frontier.offer(next, backlog);
        }
        if !backlog.is_empty() {
            trace!("[Worker {}] holding {} targets", self.id, backlog.len());
        }
    }
}
