/*!
 * Delivery Pause
 * Scoped suspension of signal delivery on the current thread
 *
 * Held around registry mutation and the signal queue buffer swap, never
 * around handler invocation. Pauses nest: each guard restores exactly the
 * mask that was in force when it was created.
 */

use nix::sys::signal::{pthread_sigmask, SigSet, SigmaskHow};
use tracing::warn;

/// RAII guard blocking signal delivery to the calling thread
#[must_use = "delivery resumes as soon as the pause is dropped"]
pub struct DeliveryPause {
    previous: Option<SigSet>,
}

impl DeliveryPause {
    /// Block every signal until the guard is dropped
    pub fn new() -> Self {
        let mut previous = SigSet::empty();
        match pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&SigSet::all()), Some(&mut previous)) {
            Ok(()) => Self {
                previous: Some(previous),
            },
            Err(errno) => {
                warn!(error = %errno, "Could not pause signal delivery");
                Self { previous: None }
            }
        }
    }

    /// Whether delivery is actually paused
    #[inline]
    pub fn is_active(&self) -> bool {
        self.previous.is_some()
    }
}

impl Default for DeliveryPause {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DeliveryPause {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if let Err(errno) = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&previous), None) {
                warn!(error = %errno, "Could not resume signal delivery");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::Signal as NixSignal;

    fn current_mask() -> SigSet {
        SigSet::thread_get_mask().unwrap()
    }

    #[test]
    fn test_pause_blocks_and_restores() {
        assert!(!current_mask().contains(NixSignal::SIGUSR2));
        {
            let pause = DeliveryPause::new();
            assert!(pause.is_active());
            assert!(current_mask().contains(NixSignal::SIGUSR2));
        }
        assert!(!current_mask().contains(NixSignal::SIGUSR2));
    }

    #[test]
    fn test_nested_pauses() {
        let outer = DeliveryPause::new();
        {
            let _inner = DeliveryPause::new();
            assert!(current_mask().contains(NixSignal::SIGINT));
        }
        // Inner restore leaves the outer pause in force
        assert!(current_mask().contains(NixSignal::SIGINT));
        drop(outer);
        assert!(!current_mask().contains(NixSignal::SIGINT));
    }
}
