/*!
 * Signal Queue
 * Fixed-capacity, allocation-free, double-buffered signal record
 *
 * Writers run in signal context and only ever append to the active buffer.
 * The reader swaps buffers (with delivery paused on its own thread) and
 * then reads the buffer that just went inactive.
 */

use crate::core::limits::{SIGNAL_QUEUE_BUFFERS, SIGNAL_QUEUE_CAPACITY};
use crate::core::types::SignalNumber;
use std::hint;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, AtomicUsize, Ordering};

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: AtomicI32 = AtomicI32::new(0);

/// One half of the queue
struct SignalBuffer<const N: usize> {
    count: AtomicUsize,
    overflow: AtomicBool,
    signals: [AtomicI32; N],
}

impl<const N: usize> SignalBuffer<N> {
    const fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
            overflow: AtomicBool::new(false),
            signals: [EMPTY_SLOT; N],
        }
    }

    fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
        self.overflow.store(false, Ordering::SeqCst);
    }
}

/// Signals taken out of the queue by one buffer swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalBatch {
    pub signals: Vec<SignalNumber>,
    /// Signals were dropped because the buffer filled up
    pub overflowed: bool,
}

/// Double-buffered signal queue
///
/// # Signal safety
/// - `record` performs a bounded number of atomic operations and never
///   allocates, blocks or locks
/// - `swap_out` must only be called from the main thread of control, with
///   signal delivery paused on that thread
pub struct SignalQueue<const N: usize = SIGNAL_QUEUE_CAPACITY> {
    buffers: [SignalBuffer<N>; SIGNAL_QUEUE_BUFFERS],
    active: AtomicUsize,
    /// Writers currently inside `record`, possibly on other threads
    writers: AtomicUsize,
    dropped: AtomicU64,
}

impl<const N: usize> SignalQueue<N> {
    pub const fn new() -> Self {
        Self {
            buffers: [SignalBuffer::new(), SignalBuffer::new()],
            active: AtomicUsize::new(0),
            writers: AtomicUsize::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Buffer capacity (compile-time constant)
    #[inline]
    pub const fn capacity() -> usize {
        N
    }

    /// Append a signal to the active buffer
    ///
    /// Returns false when the buffer was full; the signal is dropped and the
    /// buffer's overflow flag is raised.
    pub fn record(&self, signal: SignalNumber) -> bool {
        self.writers.fetch_add(1, Ordering::SeqCst);
        let buffer = &self.buffers[self.active.load(Ordering::SeqCst)];

        let stored = match buffer
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                (count < N).then_some(count + 1)
            }) {
            Ok(slot) => {
                buffer.signals[slot].store(signal, Ordering::SeqCst);
                true
            }
            Err(_) => {
                buffer.overflow.store(true, Ordering::SeqCst);
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        };

        self.writers.fetch_sub(1, Ordering::SeqCst);
        stored
    }

    /// Whether the active buffer holds anything
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.buffers[self.active.load(Ordering::SeqCst)]
            .count
            .load(Ordering::SeqCst)
            > 0
    }

    /// Signals in the active buffer
    pub fn pending_count(&self) -> usize {
        self.buffers[self.active.load(Ordering::SeqCst)]
            .count
            .load(Ordering::SeqCst)
    }

    /// Total signals dropped on overflow since creation
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Make the other buffer active and hand back what the old one recorded
    ///
    /// Returns `None` without swapping when the active buffer is empty.
    /// Callers must hold a `DeliveryPause` for the duration of the call.
    pub fn swap_out(&self) -> Option<SignalBatch> {
        let current = self.active.load(Ordering::SeqCst);
        if self.buffers[current].count.load(Ordering::SeqCst) == 0 {
            return None;
        }

        let next = 1 - current;
        self.buffers[next].reset();
        self.active.store(next, Ordering::SeqCst);

        // A writer on another thread may still be finishing a slot it
        // reserved in the old buffer
        while self.writers.load(Ordering::SeqCst) != 0 {
            hint::spin_loop();
        }

        let drained = &self.buffers[current];
        let count = drained.count.load(Ordering::SeqCst).min(N);
        let signals = drained.signals[..count]
            .iter()
            .map(|slot| slot.load(Ordering::SeqCst))
            .collect();

        Some(SignalBatch {
            signals,
            overflowed: drained.overflow.load(Ordering::SeqCst),
        })
    }
}

impl<const N: usize> Default for SignalQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_swap() {
        let queue: SignalQueue = SignalQueue::new();
        assert!(!queue.has_pending());
        assert_eq!(queue.swap_out(), None);

        assert!(queue.record(2));
        assert!(queue.record(15));
        assert_eq!(queue.pending_count(), 2);

        let batch = queue.swap_out().unwrap();
        assert_eq!(batch.signals, vec![2, 15]);
        assert!(!batch.overflowed);
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_overflow_drops_newest() {
        let queue: SignalQueue<4> = SignalQueue::new();
        for signal in 1..=6 {
            queue.record(signal);
        }
        assert_eq!(queue.dropped(), 2);

        let batch = queue.swap_out().unwrap();
        assert_eq!(batch.signals, vec![1, 2, 3, 4]);
        assert!(batch.overflowed);
    }

    #[test]
    fn test_swapped_buffer_is_reset_before_reuse() {
        let queue: SignalQueue<2> = SignalQueue::new();
        queue.record(1);
        queue.record(1);
        queue.record(1);
        assert!(queue.swap_out().unwrap().overflowed);

        // Second buffer receives writes now
        queue.record(3);
        let batch = queue.swap_out().unwrap();
        assert_eq!(batch.signals, vec![3]);
        assert!(!batch.overflowed);

        // And the first one again, with its overflow flag cleared
        queue.record(4);
        let batch = queue.swap_out().unwrap();
        assert_eq!(batch.signals, vec![4]);
        assert!(!batch.overflowed);
    }

    #[test]
    fn test_concurrent_writers() {
        use std::sync::Arc;
        use std::thread;

        let queue: Arc<SignalQueue<256>> = Arc::new(SignalQueue::new());
        let mut handles = vec![];
        for signal in 1..=4 {
            let queue = queue.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..32 {
                    queue.record(signal);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let batch = queue.swap_out().unwrap();
        assert_eq!(batch.signals.len(), 128);
        for signal in 1..=4 {
            assert_eq!(batch.signals.iter().filter(|&&s| s == signal).count(), 32);
        }
    }
}
