/*!
 * Event System
 * Handler registry, signal draining and the fire pipeline
 *
 * Lock discipline: the state mutex is only ever held for short, non-reentrant
 * sections. It is released before any collaborator that may call back into
 * the event API (the evaluator in particular) runs.
 */

use super::channel::SignalChannel;
use super::describe::describe_event;
use super::gate;
use super::holdback::HoldbackList;
use super::invocation::{build_command, InvocationScope};
use super::registry::{HandlerList, RegisteredHandler};
use super::stats::{AtomicEventStats, EventStats};
use super::traits::{EventApi, EventDispatch, HandlerRegistry, ShellHost};
use super::types::Event;
use crate::core::config::EventConfig;
use crate::core::types::SignalNumber;
use crate::monitoring::span_handler;
use crate::signals::DeliveryPause;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main-thread dispatch state
#[derive(Debug, Default)]
struct DispatchState {
    handlers: HandlerList,
    holdback: HoldbackList,
}

/// Marks the calling frame as inside event delivery
///
/// The counter can never go negative: it is only decremented by the guard
/// that incremented it.
struct DepthGuard<'a> {
    depth: &'a AtomicUsize,
    level: usize,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a AtomicUsize) -> Self {
        let level = depth.fetch_add(1, Ordering::SeqCst) + 1;
        Self { depth, level }
    }

    /// The 0 -> 1 transition, i.e. not nested inside another delivery
    #[inline]
    fn is_outermost(&self) -> bool {
        self.level == 1
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Process-scoped event dispatcher
pub struct EventSystem<H: ShellHost> {
    host: H,
    config: EventConfig,
    channel: Arc<SignalChannel>,
    state: Mutex<DispatchState>,
    depth: AtomicUsize,
    stats: AtomicEventStats,
}

impl<H: ShellHost> EventSystem<H> {
    /// Create an event system with a private signal channel
    pub fn new(host: H, config: EventConfig) -> Self {
        Self::with_channel(host, config, Arc::new(SignalChannel::new()))
    }

    /// Create an event system draining `channel`, typically the one OS
    /// signal handlers write to
    pub fn with_channel(host: H, config: EventConfig, channel: Arc<SignalChannel>) -> Self {
        info!("Event system initialized");
        Self {
            host,
            config,
            channel,
            state: Mutex::new(DispatchState::default()),
            depth: AtomicUsize::new(0),
            stats: AtomicEventStats::new(),
        }
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    #[inline]
    pub fn channel(&self) -> &Arc<SignalChannel> {
        &self.channel
    }

    pub fn stats(&self) -> EventStats {
        let mut stats = self.stats.snapshot();
        stats.signals_dropped = self.channel.queue().dropped();
        stats
    }

    /// Current event delivery nesting depth
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Instances waiting for their blocks to end
    pub fn held_count(&self) -> usize {
        self.state.lock().holdback.len()
    }

    /// Handlers detached but not yet reaped
    pub fn kill_list_len(&self) -> usize {
        self.state.lock().handlers.kill_list_len()
    }

    /// Release every handler and held instance, returning how many went away
    ///
    /// Signals caught on behalf of the released handlers go back to their
    /// default disposition.
    pub fn shutdown(self) -> usize {
        let (signals, handlers, held) = {
            let _pause = DeliveryPause::new();
            let mut state = self.state.lock();
            let signals = state.handlers.bound_signals();
            (signals, state.handlers.clear(), state.holdback.clear())
        };
        self.channel.interest().clear();

        for signal in signals {
            if let Err(error) = self.host.set_catching(signal, false) {
                warn!(signal, error = %error, "Could not stop catching signal");
            }
        }

        info!(handlers, held, "Event system shut down");
        handlers + held
    }

    #[inline]
    fn is_blocked(&self, instance: &Event) -> bool {
        gate::is_blocked(&self.host, instance)
    }

    fn signal_instance(&self, signal: SignalNumber) -> Event {
        let instance = Event::signal(signal);
        if self.config.signal_arguments {
            instance.with_arguments([self.host.signal_name(signal)])
        } else {
            instance
        }
    }

    /// Fire now, or hold back if a block suppresses the instance
    fn deliver(&self, instance: &Event) {
        if self.is_blocked(instance) {
            debug!(kind = %instance.kind(), "Event blocked, holding back");
            self.state.lock().holdback.hold(instance);
            self.stats.inc_held();
        } else {
            self.fire_internal(instance);
        }
    }

    /// Turn everything in the signal queue into delivered or held instances
    fn drain_signals(&self) {
        loop {
            let batch = {
                let _pause = DeliveryPause::new();
                self.channel.queue().swap_out()
            };
            let Some(batch) = batch else {
                break;
            };

            if batch.overflowed {
                self.stats.inc_overflows();
                if self.config.warn_on_overflow {
                    warn!("Signal list overflow. Signals have been ignored.");
                }
            }

            self.stats.add_drained(batch.signals.len());
            for signal in batch.signals {
                let instance = self.signal_instance(signal);
                self.deliver(&instance);
            }
        }
    }

    /// Retry held instances whose blocks have ended
    fn replay_held(&self) {
        let held = {
            let mut state = self.state.lock();
            if state.holdback.is_empty() {
                return;
            }
            state.holdback.take()
        };

        let mut still_blocked = Vec::new();
        for instance in held {
            if self.is_blocked(&instance) {
                still_blocked.push(instance);
            } else {
                debug!(kind = %instance.kind(), "Replaying held event");
                self.fire_internal(&instance);
                self.stats.inc_replayed();
            }
        }

        self.state.lock().holdback.restore(still_blocked);
    }

    /// One dispatch pass
    fn fire_internal(&self, instance: &Event) {
        let snapshot = {
            let mut state = self.state.lock();
            state.handlers.reap();
            if state.handlers.is_empty() {
                return;
            }
            state.handlers.snapshot(instance)
        };

        if snapshot.is_empty() {
            return;
        }

        for handler in &snapshot {
            // Removed by an earlier handler in this pass
            if handler.is_detached() {
                continue;
            }
            self.invoke(handler, instance);
        }

        self.state.lock().handlers.reap();
    }

    fn invoke(&self, handler: &RegisteredHandler, instance: &Event) {
        let command = build_command(handler.event(), instance);
        let span = span_handler(handler.id(), &command);
        let _entered = span.enter();
        debug!(kind = %instance.kind(), "Invoking event handler");

        let status = {
            let scope = InvocationScope::enter(&self.host, self, instance);
            self.host.eval(&command, &scope)
        };
        span.record_status(status);
        self.stats.inc_invoked();
    }
}

impl<H: ShellHost> HandlerRegistry for EventSystem<H> {
    fn add_handler(&self, handler: &Event) {
        {
            let _pause = DeliveryPause::new();
            let mut state = self.state.lock();
            state.handlers.push(handler);
            self.channel.interest().observe(&handler.ty);
        }
        self.stats.inc_handlers();

        if let Some(signal) = handler.signal_number() {
            if let Err(error) = self.host.set_catching(signal, true) {
                warn!(signal, error = %error, "Could not start catching signal");
            }
        }

        debug!(
            kind = %handler.kind(),
            handler = %handler.handler_name,
            "Registered event handler"
        );
    }

    fn remove(&self, criterion: &Event) -> usize {
        let removed = {
            let _pause = DeliveryPause::new();
            let mut state = self.state.lock();
            if state.handlers.is_empty() {
                return 0;
            }
            let removed = state.handlers.detach_matching(criterion);
            for entry in &removed {
                self.channel.interest().forget(&entry.event().ty);
            }
            removed
        };

        if removed.is_empty() {
            return 0;
        }
        self.stats.dec_handlers(removed.len());

        let mut signals: Vec<SignalNumber> = removed
            .iter()
            .filter_map(|entry| entry.event().signal_number())
            .collect();
        signals.sort_unstable();
        signals.dedup();

        // Stop catching signals nobody handles any more
        for signal in signals {
            if self.query(&Event::signal(signal), None) == 0 {
                if let Err(error) = self.host.set_catching(signal, false) {
                    warn!(signal, error = %error, "Could not stop catching signal");
                }
            }
        }

        debug!(count = removed.len(), "Removed event handlers");
        removed.len()
    }

    fn query(&self, criterion: &Event, out: Option<&mut Vec<Event>>) -> usize {
        self.state.lock().handlers.count_matching(criterion, out)
    }

    #[inline]
    fn is_signal_observed(&self, signal: SignalNumber) -> bool {
        self.channel.interest().is_observed(signal)
    }
}

impl<H: ShellHost> EventDispatch for EventSystem<H> {
    fn fire(&self, instance: &Event) {
        // Signals always travel through the queue
        if let Some(signal) = instance.signal_number() {
            self.record_signal(signal);
            return;
        }

        let depth = DepthGuard::enter(&self.depth);
        self.stats.inc_fired();

        self.drain_signals();
        if depth.is_outermost() {
            self.replay_held();
        }
        self.deliver(instance);
    }

    fn fire_generic(&self, name: &str, arguments: Vec<String>) {
        let mut instance = Event::generic(name);
        instance.arguments = Some(arguments);
        self.fire(&instance);
    }

    #[inline]
    fn record_signal(&self, signal: SignalNumber) {
        self.channel.queue().record(signal);
    }

    fn drain(&self) {
        let _depth = DepthGuard::enter(&self.depth);
        self.drain_signals();
    }
}

impl<H: ShellHost> EventApi for EventSystem<H> {
    fn describe(&self, event: &Event) -> String {
        describe_event(&self.host, event)
    }
}
