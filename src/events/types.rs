/*!
 * Event Types
 * Event descriptors and the matching predicate
 *
 * The same `Event` shape describes both a registered handler (a pattern)
 * and a concrete occurrence (an instance). Which role a value plays is
 * decided by where it is passed, never by the value itself.
 */

use crate::core::types::{JobId, Pid, SignalNumber};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which signal a signal event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalSpec {
    /// Wildcard, only meaningful in a handler pattern
    Any,
    Number(SignalNumber),
}

/// Which process a process-exit event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitTarget {
    /// Wildcard, only meaningful in a handler pattern
    Any,
    Process(Pid),
    ProcessGroup(Pid),
}

impl ExitTarget {
    /// Decode the classic signed-pid convention: a positive value names a
    /// process, anything else names the process group `-raw`.
    pub fn from_raw(raw: i32) -> Self {
        if raw > 0 {
            ExitTarget::Process(raw.unsigned_abs())
        } else {
            ExitTarget::ProcessGroup(raw.unsigned_abs())
        }
    }
}

/// Kind-specific payload of an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Matches every instance when used as a pattern
    Any,
    Signal(SignalSpec),
    /// Variable name
    Variable(String),
    ProcessExit(ExitTarget),
    JobExit(JobId),
    /// Application-level event name
    Generic(String),
}

impl EventType {
    pub fn kind(&self) -> EventKind {
        match self {
            EventType::Any => EventKind::Any,
            EventType::Signal(_) => EventKind::Signal,
            EventType::Variable(_) => EventKind::Variable,
            EventType::ProcessExit(_) => EventKind::ProcessExit,
            EventType::JobExit(_) => EventKind::JobExit,
            EventType::Generic(_) => EventKind::Generic,
        }
    }
}

/// Payload-free discriminant of [`EventType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Any,
    Signal,
    Variable,
    ProcessExit,
    JobExit,
    Generic,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Any => "any",
            EventKind::Signal => "signal",
            EventKind::Variable => "variable",
            EventKind::ProcessExit => "process-exit",
            EventKind::JobExit => "job-exit",
            EventKind::Generic => "generic",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Set of event kinds an execution block suppresses
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventBlockSet: u8 {
        /// Suppresses every kind
        const ANY = 1 << 0;
        const SIGNAL = 1 << 1;
        const VARIABLE = 1 << 2;
        const PROCESS_EXIT = 1 << 3;
        const JOB_EXIT = 1 << 4;
        const GENERIC = 1 << 5;
    }
}

impl EventBlockSet {
    /// Whether this set suppresses events of `kind`
    pub fn blocks(&self, kind: EventKind) -> bool {
        self.contains(EventBlockSet::ANY) || self.intersects(Self::from(kind))
    }
}

impl From<EventKind> for EventBlockSet {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Any => EventBlockSet::ANY,
            EventKind::Signal => EventBlockSet::SIGNAL,
            EventKind::Variable => EventBlockSet::VARIABLE,
            EventKind::ProcessExit => EventBlockSet::PROCESS_EXIT,
            EventKind::JobExit => EventBlockSet::JOB_EXIT,
            EventKind::Generic => EventBlockSet::GENERIC,
        }
    }
}

/// Event descriptor
///
/// `Clone` is the deep copy: the argument list is duplicated along with
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub ty: EventType,
    /// Handler: the function to invoke. Instance: when non-empty, only
    /// handlers bound to this exact function match.
    pub handler_name: String,
    pub arguments: Option<Vec<String>>,
}

impl Event {
    pub fn new(ty: EventType) -> Self {
        Self {
            ty,
            handler_name: String::new(),
            arguments: None,
        }
    }

    /// Pattern matching every event
    pub fn any() -> Self {
        Self::new(EventType::Any)
    }

    pub fn signal(signal: SignalNumber) -> Self {
        Self::new(EventType::Signal(SignalSpec::Number(signal)))
    }

    /// Pattern matching every signal
    pub fn any_signal() -> Self {
        Self::new(EventType::Signal(SignalSpec::Any))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(EventType::Variable(name.into()))
    }

    pub fn process_exit(target: ExitTarget) -> Self {
        Self::new(EventType::ProcessExit(target))
    }

    pub fn job_exit(job_id: JobId) -> Self {
        Self::new(EventType::JobExit(job_id))
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Self::new(EventType::Generic(name.into()))
    }

    /// Bind (handler) or restrict (instance) to a function name
    pub fn with_handler(mut self, name: impl Into<String>) -> Self {
        self.handler_name = name.into();
        self
    }

    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = Some(arguments.into_iter().map(Into::into).collect());
        self
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.ty.kind()
    }

    /// Concrete signal number, if this is a non-wildcard signal event
    pub fn signal_number(&self) -> Option<SignalNumber> {
        match self.ty {
            EventType::Signal(SignalSpec::Number(signal)) => Some(signal),
            _ => None,
        }
    }

    /// Copy without the argument list, the form stored for a handler
    pub fn stored_form(&self) -> Self {
        Self {
            ty: self.ty.clone(),
            handler_name: self.handler_name.clone(),
            arguments: None,
        }
    }

    /// Arguments as a slice, empty when absent
    pub fn argument_list(&self) -> &[String] {
        self.arguments.as_deref().unwrap_or(&[])
    }

    /// Whether this event, used as a pattern, matches `instance`
    #[inline]
    pub fn matches(&self, instance: &Event) -> bool {
        matches(self, instance)
    }
}

/// Does handler pattern `pattern` fire for occurrence `instance`?
///
/// A handler-name restriction on both sides is checked first and wins over
/// every kind-specific rule.
pub fn matches(pattern: &Event, instance: &Event) -> bool {
    if !pattern.handler_name.is_empty()
        && !instance.handler_name.is_empty()
        && pattern.handler_name != instance.handler_name
    {
        return false;
    }

    match (&pattern.ty, &instance.ty) {
        (EventType::Any, _) => true,
        (EventType::Signal(SignalSpec::Any), EventType::Signal(_)) => true,
        (EventType::Signal(expected), EventType::Signal(actual)) => expected == actual,
        (EventType::Variable(expected), EventType::Variable(actual)) => expected == actual,
        (EventType::ProcessExit(ExitTarget::Any), EventType::ProcessExit(_)) => true,
        (EventType::ProcessExit(expected), EventType::ProcessExit(actual)) => expected == actual,
        (EventType::JobExit(expected), EventType::JobExit(actual)) => expected == actual,
        (EventType::Generic(expected), EventType::Generic(actual)) => expected == actual,
        _ => false,
    }
}
