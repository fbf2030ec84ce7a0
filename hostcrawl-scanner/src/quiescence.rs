//! Completion detection for the worker pool.
//!
//! An empty frontier alone does not mean the crawl is over: a worker may be
//! between taking a target and pushing the links it found. The tracker counts
//! both queued and in-flight targets under one lock and wakes the coordinator
//! the moment both reach zero.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// A consistent snapshot of outstanding work.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub queued: usize,
    pub in_flight: usize,
}

impl Activity {
    pub fn is_idle(&self) -> bool {
        self.queued == 0 && self.in_flight == 0
    }
}

#[derive(Debug, Default)]
pub struct QuiescenceTracker {
    state: Mutex<Activity>,
    idle: Notify,
}

impl QuiescenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity(&self) -> Activity {
        *self.state.lock()
    }

    /// Must be called before the target is handed to the queue, so the count
    /// never lags behind what a consumer can observe.
    pub fn enqueued(&self) {
        self.state.lock().queued += 1;
    }

    /// A push that was counted but never made it into the queue.
    pub fn withdrawn(&self) {
        self.withdrawn_many(1);
    }

    pub fn withdrawn_many(&self, count: usize) {
        let mut state = self.state.lock();
        state.queued = state.queued.saturating_sub(count);
        self.wake_if_idle(&state);
    }

    /// Moves one target from queued to in flight in a single step.
    pub fn checked_out(&self) {
        let mut state = self.state.lock();
        state.queued = state.queued.saturating_sub(1);
        state.in_flight += 1;
    }

    /// The worker is done with a target, including pushing its discoveries.
    pub fn finished(&self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        self.wake_if_idle(&state);
    }

    fn wake_if_idle(&self, state: &Activity) {
        if state.is_idle() {
            self.idle.notify_one();
        }
    }

    /// Resolves once nothing is queued and nothing is in flight.
    ///
    /// Only meaningful after the seed has been enqueued; before that the
    /// tracker is trivially idle.
    pub async fn wait_idle(&self) {
        loop {
            if self.activity().is_idle() {
                return;
            }
            self.idle.notified().await;
        }
    }
}

/// Marks a checked-out target as finished when dropped.
///
/// Dropping covers every exit from a worker iteration: normal completion, an
/// early `continue` for an already-claimed target, and unwinding.
#[derive(Debug)]
pub struct InFlightGuard {
    tracker: Arc<QuiescenceTracker>,
}

impl InFlightGuard {
    pub fn new(tracker: Arc<QuiescenceTracker>) -> Self {
        tracker.checked_out();
        Self { tracker }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tracker.finished();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_checkout_keeps_work_outstanding() {
        let tracker = Arc::new(QuiescenceTracker::new());
        tracker.enqueued();

        let guard = InFlightGuard::new(tracker.clone());
        assert_eq!(
            tracker.activity(),
            Activity {
                queued: 0,
                in_flight: 1
            }
        );
        assert!(!tracker.activity().is_idle());

        drop(guard);
        assert!(tracker.activity().is_idle());
    }

    #[test]
    fn test_discoveries_pushed_before_finish() {
        let tracker = Arc::new(QuiescenceTracker::new());
        tracker.enqueued();
        let guard = InFlightGuard::new(tracker.clone());
        tracker.enqueued();
        tracker.enqueued();
        drop(guard);

        assert_eq!(
            tracker.activity(),
            Activity {
                queued: 2,
                in_flight: 0
            }
        );
    }

    #[test]
    fn test_withdrawn_push_does_not_underflow() {
        let tracker = QuiescenceTracker::new();
        tracker.withdrawn();
        assert!(tracker.activity().is_idle());
    }

    #[tokio::test]
    async fn test_wait_idle_wakes_on_last_finish() {
        let tracker = Arc::new(QuiescenceTracker::new());
        tracker.enqueued();
        let guard = InFlightGuard::new(tracker.clone());

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_idle().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait_idle should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_idle_survives_notification_before_wait() {
        let tracker = Arc::new(QuiescenceTracker::new());
        tracker.enqueued();
        drop(InFlightGuard::new(tracker.clone()));

        tokio::time::timeout(Duration::from_secs(1), tracker.wait_idle())
            .await
            .expect("already idle");
    }
}
