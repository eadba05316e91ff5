//! Pipeline counters shared by both stages

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated lock-free by the stages
#[derive(Debug, Default)]
pub struct PipelineStats {
    records_consumed: AtomicU64,
    records_handed_off: AtomicU64,
    records_skipped: AtomicU64,
    records_published: AtomicU64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_consumed(&self) {
        self.records_consumed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_handed_off(&self) {
        self.records_handed_off.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.records_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_published(&self) {
        self.records_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn records_consumed(&self) -> u64 {
        self.records_consumed.load(Ordering::Relaxed)
    }

    pub fn records_handed_off(&self) -> u64 {
        self.records_handed_off.load(Ordering::Relaxed)
    }

    pub fn records_published(&self) -> u64 {
        self.records_published.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            records_consumed: self.records_consumed(),
            records_handed_off: self.records_handed_off(),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
            records_published: self.records_published(),
        }
    }
}

/// Counter values at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub records_consumed: u64,
    pub records_handed_off: u64,
    pub records_skipped: u64,
    pub records_published: u64,
}
