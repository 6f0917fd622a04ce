/*!
 * Shell Events Library
 * Event registration, signal queueing and handler dispatch for a shell
 */

pub mod core;
pub mod events;
pub mod monitoring;
pub mod signals;

// Re-exports
pub use crate::core::{EventConfig, EventError, EventResult};
pub use events::{
    BlockStack, Evaluator, Event, EventApi, EventBlockSet, EventDispatch, EventKind, EventStats,
    EventSystem, EventType, ExitTarget, HandlerRegistry, InvocationScope, JobLookup, ShellHost,
    SignalChannel, SignalDescriber, SignalDisposition, SignalSpec,
};
pub use monitoring::init_tracing;
pub use signals::{install_signal_channel, DeliveryPause, OsSignalDisposition, SignalTable};
