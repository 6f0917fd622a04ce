/*!
 * System Limits and Constants
 *
 * Fixed sizes used by the signal path. Everything here is sized at compile
 * time because the structures it dimensions are written from signal context.
 */

// =============================================================================
// SIGNAL QUEUE
// =============================================================================

/// Signals each queue buffer holds before overflowing (64)
/// Signals beyond this between two drains are dropped and reported once
pub const SIGNAL_QUEUE_CAPACITY: usize = 64;

/// Number of buffers in the signal queue
/// One accepts writes while the other is being drained
pub const SIGNAL_QUEUE_BUFFERS: usize = 2;

// =============================================================================
// SIGNAL INTEREST
// =============================================================================

/// Size of the per-signal interest table (Linux NSIG)
/// Signal numbers at or above this are only visible to wildcard handlers
pub const SIGNAL_TABLE_SIZE: usize = 65;
