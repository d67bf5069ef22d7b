//! Shared counters surfaced by store implementations.
//!
//! The counters track resource acquisition and release at the storage
//! seams: how many times an index was opened, and how many cursors are
//! currently live. Consumers use them to observe laziness (no index open
//! before the first pull) and release (no cursor outlives its scan).

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct StoreStats {
    index_opens: AtomicU64,
    open_index_cursors: AtomicI64,
    open_document_cursors: AtomicI64,
}

impl StoreStats {
    pub fn new() -> StoreStats {
        StoreStats::default()
    }

    /// Total number of `open_index` calls observed.
    pub fn index_opens(&self) -> u64 {
        self.index_opens.load(Ordering::Relaxed)
    }

    /// Number of index page cursors currently open.
    pub fn open_index_cursors(&self) -> i64 {
        self.open_index_cursors.load(Ordering::Relaxed)
    }

    /// Number of document cursors currently open.
    pub fn open_document_cursors(&self) -> i64 {
        self.open_document_cursors.load(Ordering::Relaxed)
    }

    pub(crate) fn record_index_open(&self) {
        self.index_opens.fetch_add(1, Ordering::Relaxed);
        self.open_index_cursors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_index_cursor_close(&self) {
        self.open_index_cursors.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn record_document_cursor_open(&self) {
        self.open_document_cursors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_document_cursor_close(&self) {
        self.open_document_cursors.fetch_sub(1, Ordering::Relaxed);
    }
}
