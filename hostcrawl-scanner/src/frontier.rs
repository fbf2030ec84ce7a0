use crate::error::{CrawlError, Result};
use crate::quiescence::{InFlightGuard, QuiescenceTracker};
use crate::target::Target;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

/// Bounded work queue shared by every worker.
///
/// Any worker may push and any worker may pop. The single channel receiver
/// sits behind an async mutex so consumers take turns waiting on it. Every
/// operation reports to the quiescence tracker.
#[derive(Debug)]
pub struct Frontier {
    tx: mpsc::Sender<Target>,
    rx: Mutex<mpsc::Receiver<Target>>,
    tracker: Arc<QuiescenceTracker>,
    capacity: usize,
}

/// A target taken off the frontier. It counts as in flight until dropped.
#[derive(Debug)]
pub struct Checkout {
    target: Target,
    _guard: InFlightGuard,
}

impl Checkout {
    pub fn target(&self) -> &Target {
        &self.target
    }
}

/// Discoveries a worker could not fit into a full frontier.
///
/// Held items count as queued, the same as items in the frontier. The count
/// only drops when one is taken back out with [`Backlog::take`] or when the
/// backlog is dropped.
#[derive(Debug)]
pub struct Backlog {
    items: VecDeque<Target>,
    tracker: Arc<QuiescenceTracker>,
}

impl Backlog {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks out the oldest held target for the owning worker to process.
    pub fn take(&mut self) -> Option<Checkout> {
        let target = self.items.pop_front()?;
        Some(Checkout {
            target,
            _guard: InFlightGuard::new(self.tracker.clone()),
        })
    }
}

impl Drop for Backlog {
    fn drop(&mut self) {
        if !self.items.is_empty() {
            self.tracker.withdrawn_many(self.items.len());
        }
    }
}

impl Frontier {
    pub fn new(capacity: usize, tracker: Arc<QuiescenceTracker>) -> Result<Self> {
        if capacity == 0 {
            return Err(CrawlError::InvalidConfig(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        let (tx, rx) = mpsc::channel(capacity);
        Ok(Self {
            tx,
            rx: Mutex::new(rx),
            tracker,
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of targets currently buffered.
    pub fn len(&self) -> usize {
        self.capacity - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits for room and enqueues `target`. Returns `false` if cancellation
    /// fired first, in which case the target is dropped.
    ///
    /// Only for callers that hold nothing in flight. Workers use
    /// [`Frontier::offer`] so a full queue can never stall the pool.
    pub async fn push(&self, target: Target, cancel: &CancellationToken) -> bool {
        self.tracker.enqueued();
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            res = self.tx.send(target) => res.is_ok(),
        };
        if !sent {
            self.tracker.withdrawn();
        }
        sent
    }

    /// An empty backlog bound to this frontier's tracker.
    pub fn backlog(&self) -> Backlog {
        Backlog {
            items: VecDeque::new(),
            tracker: self.tracker.clone(),
        }
    }

    /// Enqueues without waiting. A target that does not fit goes to
    /// `backlog`, as does anything offered while the backlog is non-empty,
    /// so the worker's discoveries keep their order.
    pub fn offer(&self, target: Target, backlog: &mut Backlog) {
        self.tracker.enqueued();
        if !backlog.is_empty() {
            backlog.items.push_back(target);
            return;
        }
        if let Err(TrySendError::Full(target) | TrySendError::Closed(target)) =
            self.tx.try_send(target)
        {
            backlog.items.push_back(target);
        }
    }

    /// Moves as much of `backlog` into the frontier as currently fits.
    pub fn flush(&self, backlog: &mut Backlog) {
        while let Some(target) = backlog.items.pop_front() {
            if let Err(TrySendError::Full(target) | TrySendError::Closed(target)) =
                self.tx.try_send(target)
            {
                backlog.items.push_front(target);
                break;
            }
        }
    }

    /// Waits for the next target. Returns `None` once cancellation fires.
    pub async fn pop(&self, cancel: &CancellationToken) -> Option<Checkout> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            checkout = self.next() => checkout,
        }
    }

    async fn next(&self) -> Option<Checkout> {
        let mut rx = self.rx.lock().await;
        let target = rx.recv().await?;
        Some(Checkout {
            target,
            _guard: InFlightGuard::new(self.tracker.clone()),
        })
    }
}
