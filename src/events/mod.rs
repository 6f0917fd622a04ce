/*!
 * Events Module
 * Event descriptors, handler registry, signal queue and dispatch
 */

pub mod channel;
pub mod describe;
pub mod gate;
mod holdback;
pub mod invocation;
pub mod queue;
mod registry;
pub mod stats;
pub mod system;
pub mod traits;
pub mod types;

// Re-export public API
pub use channel::{SignalChannel, SignalInterest};
pub use describe::describe_event;
pub use invocation::{build_command, escape_argument, InvocationScope};
pub use queue::{SignalBatch, SignalQueue};
pub use registry::RegisteredHandler;
pub use stats::EventStats;
pub use system::EventSystem;
pub use traits::{
    BlockStack, Evaluator, EventApi, EventDispatch, HandlerRegistry, JobLookup, ShellHost,
    SignalDescriber, SignalDisposition,
};
pub use types::{matches, Event, EventBlockSet, EventKind, EventType, ExitTarget, SignalSpec};
