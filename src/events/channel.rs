/*!
 * Signal Channel
 * Everything an OS signal handler is allowed to touch
 *
 * The channel pairs the signal queue with an interest table: per-signal
 * counts of registered handlers, kept in step with the handler registry by
 * the main thread. Signal context reads the table to decide whether a
 * signal is worth recording, without ever looking at the registry itself.
 */

use super::queue::SignalQueue;
use super::types::{EventType, SignalSpec};
use crate::core::limits::SIGNAL_TABLE_SIZE;
use crate::core::types::SignalNumber;
use std::sync::atomic::{AtomicUsize, Ordering};

#[allow(clippy::declare_interior_mutable_const)]
const NO_HANDLERS: AtomicUsize = AtomicUsize::new(0);

/// Lock-free handler counts per signal
pub struct SignalInterest {
    /// Any-event and any-signal handlers
    wildcard: AtomicUsize,
    per_signal: [AtomicUsize; SIGNAL_TABLE_SIZE],
}

impl SignalInterest {
    pub const fn new() -> Self {
        Self {
            wildcard: AtomicUsize::new(0),
            per_signal: [NO_HANDLERS; SIGNAL_TABLE_SIZE],
        }
    }

    fn slot(&self, ty: &EventType) -> Option<&AtomicUsize> {
        match ty {
            EventType::Any | EventType::Signal(SignalSpec::Any) => Some(&self.wildcard),
            EventType::Signal(SignalSpec::Number(signal)) => usize::try_from(*signal)
                .ok()
                .and_then(|index| self.per_signal.get(index)),
            _ => None,
        }
    }

    /// Count a newly registered handler
    pub fn observe(&self, ty: &EventType) {
        if let Some(slot) = self.slot(ty) {
            slot.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Forget a handler that left the registry
    pub fn forget(&self, ty: &EventType) {
        if let Some(slot) = self.slot(ty) {
            let _ = slot.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            });
        }
    }

    /// Signal-context safe: no allocation, no locking
    #[inline]
    pub fn is_observed(&self, signal: SignalNumber) -> bool {
        if self.wildcard.load(Ordering::SeqCst) > 0 {
            return true;
        }
        usize::try_from(signal)
            .ok()
            .and_then(|index| self.per_signal.get(index))
            .map(|count| count.load(Ordering::SeqCst) > 0)
            .unwrap_or(false)
    }

    /// Drop every count
    pub fn clear(&self) {
        self.wildcard.store(0, Ordering::SeqCst);
        for count in &self.per_signal {
            count.store(0, Ordering::SeqCst);
        }
    }
}

impl Default for SignalInterest {
    fn default() -> Self {
        Self::new()
    }
}

/// Signal queue plus interest table
pub struct SignalChannel {
    queue: SignalQueue,
    interest: SignalInterest,
}

impl SignalChannel {
    pub const fn new() -> Self {
        Self {
            queue: SignalQueue::new(),
            interest: SignalInterest::new(),
        }
    }

    #[inline]
    pub fn queue(&self) -> &SignalQueue {
        &self.queue
    }

    #[inline]
    pub fn interest(&self) -> &SignalInterest {
        &self.interest
    }

    /// Entry point for OS signal handlers: record the signal only if some
    /// handler could care about it
    #[inline]
    pub fn record_if_observed(&self, signal: SignalNumber) -> bool {
        self.interest.is_observed(signal) && self.queue.record(signal)
    }
}

impl Default for SignalChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_counts() {
        let interest = SignalInterest::new();
        let sigint = EventType::Signal(SignalSpec::Number(2));
        assert!(!interest.is_observed(2));

        interest.observe(&sigint);
        interest.observe(&sigint);
        assert!(interest.is_observed(2));
        assert!(!interest.is_observed(15));

        interest.forget(&sigint);
        assert!(interest.is_observed(2));
        interest.forget(&sigint);
        assert!(!interest.is_observed(2));

        // Never underflows
        interest.forget(&sigint);
        assert!(!interest.is_observed(2));
    }

    #[test]
    fn test_wildcards_observe_everything() {
        let interest = SignalInterest::new();
        interest.observe(&EventType::Any);
        assert!(interest.is_observed(2));
        assert!(interest.is_observed(200));
        interest.forget(&EventType::Any);

        interest.observe(&EventType::Signal(SignalSpec::Any));
        assert!(interest.is_observed(10));
        interest.clear();
        assert!(!interest.is_observed(10));
    }

    #[test]
    fn test_non_signal_kinds_are_ignored() {
        let interest = SignalInterest::new();
        interest.observe(&EventType::Generic("x".into()));
        interest.observe(&EventType::Signal(SignalSpec::Number(-1)));
        assert!(!interest.is_observed(2));
        assert!(!interest.is_observed(-1));
    }

    #[test]
    fn test_record_if_observed() {
        let channel = SignalChannel::new();
        assert!(!channel.record_if_observed(2));
        channel.interest().observe(&EventType::Signal(SignalSpec::Number(2)));
        assert!(channel.record_if_observed(2));
        assert!(!channel.record_if_observed(3));
        assert_eq!(channel.queue().pending_count(), 1);
    }
}
