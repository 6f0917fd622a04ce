/*!
 * Event Traits
 * Shell collaborators the dispatcher calls out to, and the event API
 * handler bodies call back into
 */

use super::invocation::InvocationScope;
use super::types::{Event, EventBlockSet};
use crate::core::errors::EventResult;
use crate::core::types::{ExitStatus, JobId, JobInfo, Pid, SignalNumber};

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Command evaluator that runs handler bodies
pub trait Evaluator {
    /// Evaluate `command`; the scope exposes the firing instance
    fn eval(&self, command: &str, scope: &InvocationScope<'_>) -> ExitStatus;

    fn is_interactive(&self) -> bool;

    fn set_interactive(&self, interactive: bool);

    fn last_status(&self) -> ExitStatus;

    fn set_last_status(&self, status: ExitStatus);
}

/// OS-level signal disposition
pub trait SignalDisposition {
    /// Start or stop catching `signal`
    fn set_catching(&self, signal: SignalNumber, enabled: bool) -> EventResult<()>;
}

/// Signal name and description lookup
pub trait SignalDescriber {
    /// Symbolic name, e.g. `SIGINT`
    fn signal_name(&self, signal: SignalNumber) -> String;

    /// Human-readable description, e.g. `Interrupt`
    fn signal_description(&self, signal: SignalNumber) -> String;
}

/// Job and process lookup
pub trait JobLookup {
    fn job_by_pgid(&self, pgid: Pid) -> Option<JobInfo>;

    fn job_by_id(&self, job_id: JobId) -> Option<JobInfo>;
}

/// View of the evaluator's live execution-block stack
pub trait BlockStack {
    /// Number of live blocks
    fn block_count(&self) -> usize;

    /// Event suppressions of the block `depth` levels out (0 = innermost)
    fn block_suppression(&self, depth: usize) -> EventBlockSet;

    /// Process-wide suppressions, consulted after every block
    fn global_suppression(&self) -> EventBlockSet;
}

/// Everything the dispatcher needs from the shell
pub trait ShellHost: Evaluator + SignalDisposition + SignalDescriber + JobLookup + BlockStack {}

impl<T> ShellHost for T where T: Evaluator + SignalDisposition + SignalDescriber + JobLookup + BlockStack
{}

// =============================================================================
// EVENT API
// =============================================================================

/// Handler registration
pub trait HandlerRegistry {
    /// Register a copy of `handler` (arguments are not kept)
    fn add_handler(&self, handler: &Event);

    /// Detach every handler matching `criterion`, returning how many
    fn remove(&self, criterion: &Event) -> usize;

    /// Count handlers matching `criterion`, optionally collecting copies
    fn query(&self, criterion: &Event, out: Option<&mut Vec<Event>>) -> usize;

    /// Signal-context safe check for any handler interested in `signal`
    fn is_signal_observed(&self, signal: SignalNumber) -> bool;
}

/// Event delivery
pub trait EventDispatch {
    /// Deliver `instance` to matching handlers, or hold it back if blocked
    fn fire(&self, instance: &Event);

    /// Fire a generic event with positional arguments
    fn fire_generic(&self, name: &str, arguments: Vec<String>);

    /// Signal-context entry point
    fn record_signal(&self, signal: SignalNumber);

    /// Deliver every queued signal (main thread safe point)
    fn drain(&self);
}

/// Combined event API
pub trait EventApi: HandlerRegistry + EventDispatch {
    /// Human-readable description of `event`
    fn describe(&self, event: &Event) -> String;
}
