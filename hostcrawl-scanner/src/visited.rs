use crate::target::Target;
use parking_lot::RwLock;
use std::collections::HashSet;

/// Every target ever claimed during a crawl.
///
/// `try_claim` is the admission gate: exactly one caller wins the claim for a
/// given target, so each page is fetched at most once no matter how many
/// workers discover it.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: RwLock<HashSet<Target>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `target` if absent. Returns `true` if it was already present,
    /// in which case the caller must not fetch it.
    pub fn try_claim(&self, target: &Target) -> bool {
        let mut visited = self.inner.write();
        if visited.contains(target) {
            return true;
        }
        visited.insert(target.clone());
        false
    }

    pub fn contains(&self, target: &Target) -> bool {
        self.inner.read().contains(target)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Copies the claimed targets out, sorted for stable output.
    pub fn snapshot(&self) -> Vec<Target> {
        let mut targets: Vec<Target> = self.inner.read().iter().cloned().collect();
        targets.sort();
        targets
    }
}
