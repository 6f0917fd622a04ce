/*!
 * Handler Registry
 * Ordered handler storage with deferred deletion
 *
 * Removal only detaches a handler: it moves to the kill list and is marked,
 * and physical release happens when the dispatcher reaps the list at a pass
 * boundary. Snapshots held by an in-flight pass keep their handlers alive
 * and see the mark.
 */

use super::types::Event;
use crate::core::types::{HandlerId, SignalNumber};
use ahash::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A handler pattern as stored in the registry
#[derive(Debug)]
pub struct RegisteredHandler {
    id: HandlerId,
    event: Event,
    detached: AtomicBool,
}

impl RegisteredHandler {
    fn new(id: HandlerId, event: Event) -> Self {
        Self {
            id,
            event,
            detached: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn id(&self) -> HandlerId {
        self.id
    }

    #[inline]
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Removed from the registry, possibly not yet reaped
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

/// Registry contents, owned by the main thread of control
#[derive(Debug, Default)]
pub(crate) struct HandlerList {
    handlers: Vec<Arc<RegisteredHandler>>,
    kill_list: HashMap<HandlerId, Arc<RegisteredHandler>>,
    next_id: HandlerId,
}

impl HandlerList {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Append a handler, keeping only its stored form
    pub fn push(&mut self, handler: &Event) -> Arc<RegisteredHandler> {
        self.next_id += 1;
        let entry = Arc::new(RegisteredHandler::new(self.next_id, handler.stored_form()));
        self.handlers.push(entry.clone());
        entry
    }

    /// Move every handler matching `criterion` to the kill list
    pub fn detach_matching(&mut self, criterion: &Event) -> Vec<Arc<RegisteredHandler>> {
        let mut removed = Vec::new();
        self.handlers.retain(|entry| {
            if criterion.matches(&entry.event) {
                removed.push(entry.clone());
                false
            } else {
                true
            }
        });

        for entry in &removed {
            entry.detached.store(true, Ordering::SeqCst);
            self.kill_list.insert(entry.id, entry.clone());
        }
        removed
    }

    /// Number of handlers matching `criterion`, optionally collecting copies
    pub fn count_matching(&self, criterion: &Event, mut out: Option<&mut Vec<Event>>) -> usize {
        let mut found = 0;
        for entry in &self.handlers {
            if criterion.matches(&entry.event) {
                found += 1;
                if let Some(out) = out.as_deref_mut() {
                    out.push(entry.event.clone());
                }
            }
        }
        found
    }

    /// Handlers that fire for `instance`, in registration order
    pub fn snapshot(&self, instance: &Event) -> Vec<Arc<RegisteredHandler>> {
        self.handlers
            .iter()
            .filter(|entry| entry.event.matches(instance))
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub fn is_killed(&self, id: HandlerId) -> bool {
        self.kill_list.contains_key(&id)
    }

    pub fn kill_list_len(&self) -> usize {
        self.kill_list.len()
    }

    /// Release everything on the kill list
    pub fn reap(&mut self) -> usize {
        let reaped = self.kill_list.len();
        self.kill_list.clear();
        reaped
    }

    /// Distinct signal numbers that live handlers are bound to
    pub fn bound_signals(&self) -> Vec<SignalNumber> {
        let mut signals: Vec<SignalNumber> = self
            .handlers
            .iter()
            .filter_map(|entry| entry.event.signal_number())
            .collect();
        signals.sort_unstable();
        signals.dedup();
        signals
    }

    /// Detach and release everything, returning how many entries went away
    pub fn clear(&mut self) -> usize {
        let released = self.handlers.len() + self.kill_list.len();
        for entry in self.handlers.drain(..) {
            entry.detached.store(true, Ordering::SeqCst);
        }
        self.kill_list.clear();
        released
    }
}
