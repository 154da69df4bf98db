//! ResultStore - Detection Result Log
//!
//! ## Responsibilities
//!
//! - Own the ordered log of detection results (newest first)
//! - Provide snapshot queries for the presentation layer
//!
//! The store itself is unbounded; retention is a caller decision. The live
//! feed appends through [`ResultStore::append_capped`] with its configured
//! cap, manual uploads append unbounded.

use crate::models::DetectionResult;
use tokio::sync::RwLock;

/// ResultStore instance
pub struct ResultStore {
    log: RwLock<Vec<DetectionResult>>,
}

impl ResultStore {
    /// Create new empty ResultStore
    pub fn new() -> Self {
        Self {
            log: RwLock::new(Vec::new()),
        }
    }

    /// Prepend a result to the log (newest first), unbounded
    pub async fn append(&self, result: DetectionResult) {
        let mut log = self.log.write().await;
        tracing::debug!(
            id = %result.id,
            status = %result.overall_status,
            "Result appended"
        );
        log.insert(0, result);
    }

    /// Prepend a result and retain only the `cap` most recent entries
    ///
    /// The cap is the caller's retention policy, not a store invariant.
    pub async fn append_capped(&self, result: DetectionResult, cap: usize) {
        let mut log = self.log.write().await;
        tracing::debug!(
            id = %result.id,
            status = %result.overall_status,
            cap = cap,
            "Result appended (capped)"
        );
        log.insert(0, result);
        if log.len() > cap {
            let evicted = log.len() - cap;
            log.truncate(cap);
            tracing::debug!(evicted = evicted, "Oldest results evicted");
        }
    }

    /// Snapshot of the full log, newest first
    pub async fn snapshot(&self) -> Vec<DetectionResult> {
        self.log.read().await.clone()
    }

    /// The `n` most recent results
    pub async fn latest(&self, n: usize) -> Vec<DetectionResult> {
        self.log.read().await.iter().take(n).cloned().collect()
    }

    /// Look up a result by id
    pub async fn find(&self, id: &str) -> Option<DetectionResult> {
        self.log.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Number of stored results
    pub async fn count(&self) -> usize {
        self.log.read().await.len()
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}
