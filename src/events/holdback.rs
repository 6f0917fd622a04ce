/*!
 * Holdback List
 * Instances postponed because a block suppressed them at fire time
 */

use super::types::Event;

/// Ordered list of blocked instances, each an owned deep copy
#[derive(Debug, Default)]
pub(crate) struct HoldbackList {
    held: Vec<Event>,
}

impl HoldbackList {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Hold a deep copy of `instance`
    pub fn hold(&mut self, instance: &Event) {
        self.held.push(instance.clone());
    }

    /// Take every held instance, leaving the list empty
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.held)
    }

    /// Put back instances that are still blocked, ahead of anything held
    /// while they were out of the list
    pub fn restore(&mut self, mut still_blocked: Vec<Event>) {
        still_blocked.append(&mut self.held);
        self.held = still_blocked;
    }

    pub fn clear(&mut self) -> usize {
        let released = self.held.len();
        self.held.clear();
        released
    }
}
