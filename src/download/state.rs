//! Run statistics shared by the walker and workers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated concurrently during an export.
#[derive(Debug, Default)]
pub struct RunStats {
    collections: AtomicU64,
    pages: AtomicU64,
    pages_failed: AtomicU64,
    listed: AtomicU64,
    skipped: AtomicU64,
    dispatched: AtomicU64,
    saved: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`RunStats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub collections: u64,
    pub pages: u64,
    pub pages_failed: u64,
    pub listed: u64,
    pub skipped: u64,
    pub dispatched: u64,
    pub saved: u64,
    pub failed: u64,
}

impl RunStats {
    pub fn add_collections(&self, n: u64) {
        self.collections.fetch_add(n, Ordering::Relaxed);
    }

    pub fn increment_page(&self) {
        self.pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_page_failed(&self) {
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_listed(&self, n: u64) {
        self.listed.fetch_add(n, Ordering::Relaxed);
    }

    /// Photo already recorded in the manifest or in flight.
    pub fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_saved(&self) {
        self.saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            collections: self.collections.load(Ordering::Relaxed),
            pages: self.pages.load(Ordering::Relaxed),
            pages_failed: self.pages_failed.load(Ordering::Relaxed),
            listed: self.listed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_reflects_counters() {
        let stats = RunStats::default();
        stats.add_collections(2);
        stats.increment_page();
        stats.add_listed(3);
        stats.increment_skipped();
        stats.increment_dispatched();
        stats.increment_dispatched();
        stats.increment_saved();
        stats.increment_failed();

        assert_eq!(
            stats.summary(),
            RunSummary {
                collections: 2,
                pages: 1,
                pages_failed: 0,
                listed: 3,
                skipped: 1,
                dispatched: 2,
                saved: 1,
                failed: 1,
            }
        );
    }
}
