/*!
 * Lock-Free Event Statistics
 * Atomic counters updated on the dispatch path
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Event statistics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStats {
    pub handlers_registered: usize,
    pub handlers_removed: u64,
    pub events_fired: u64,
    pub handlers_invoked: u64,
    pub events_held: u64,
    pub events_replayed: u64,
    pub signals_drained: u64,
    pub signal_overflows: u64,
    /// Signals lost to full queue buffers
    pub signals_dropped: u64,
}

/// Atomic event statistics
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - All operations use relaxed ordering; a snapshot may be slightly
///   inconsistent across fields but every field is accurate on its own
#[repr(C, align(64))]
#[derive(Default)]
pub struct AtomicEventStats {
    handlers_registered: AtomicUsize,
    handlers_removed: AtomicU64,
    events_fired: AtomicU64,
    handlers_invoked: AtomicU64,
    events_held: AtomicU64,
    events_replayed: AtomicU64,
    signals_drained: AtomicU64,
    signal_overflows: AtomicU64,
}

impl AtomicEventStats {
    #[inline]
    pub const fn new() -> Self {
        Self {
            handlers_registered: AtomicUsize::new(0),
            handlers_removed: AtomicU64::new(0),
            events_fired: AtomicU64::new(0),
            handlers_invoked: AtomicU64::new(0),
            events_held: AtomicU64::new(0),
            events_replayed: AtomicU64::new(0),
            signals_drained: AtomicU64::new(0),
            signal_overflows: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    pub fn inc_handlers(&self) {
        self.handlers_registered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn dec_handlers(&self, count: usize) {
        let _ = self
            .handlers_registered
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_sub(count))
            });
        self.handlers_removed
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_fired(&self) {
        self.events_fired.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_invoked(&self) {
        self.handlers_invoked.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_held(&self) {
        self.events_held.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_replayed(&self) {
        self.events_replayed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn add_drained(&self, count: usize) {
        self.signals_drained
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_overflows(&self) {
        self.signal_overflows.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats (no locks required)
    #[inline]
    pub fn snapshot(&self) -> EventStats {
        EventStats {
            handlers_registered: self.handlers_registered.load(Ordering::Relaxed),
            handlers_removed: self.handlers_removed.load(Ordering::Relaxed),
            events_fired: self.events_fired.load(Ordering::Relaxed),
            handlers_invoked: self.handlers_invoked.load(Ordering::Relaxed),
            events_held: self.events_held.load(Ordering::Relaxed),
            events_replayed: self.events_replayed.load(Ordering::Relaxed),
            signals_drained: self.signals_drained.load(Ordering::Relaxed),
            signal_overflows: self.signal_overflows.load(Ordering::Relaxed),
            signals_dropped: 0,
        }
    }
}
