/*!
 * Handler Invocation
 * Command text construction and the scope a handler body runs in
 */

use super::traits::{EventApi, Evaluator};
use super::types::Event;
use crate::core::types::ExitStatus;
use std::borrow::Cow;

/// Quote one argument for the shell
///
/// Plain words pass through untouched; NUL bytes cannot be represented on a
/// command line and are removed.
pub fn escape_argument(argument: &str) -> Cow<'_, str> {
    match shlex::try_quote(argument) {
        Ok(quoted) => quoted,
        Err(_) => {
            let cleaned = argument.replace('\0', "");
            Cow::Owned(shlex::try_quote(&cleaned).map(Cow::into_owned).unwrap_or(cleaned))
        }
    }
}

/// Handler name followed by each instance argument, escaped and space-joined
pub fn build_command(handler: &Event, instance: &Event) -> String {
    let mut command = handler.handler_name.clone();
    for argument in instance.argument_list() {
        command.push(' ');
        command.push_str(&escape_argument(argument));
    }
    command
}

/// Scope a handler body is evaluated in
///
/// While alive the evaluator is non-interactive; dropping the scope restores
/// the previous interactive mode and last status.
pub struct InvocationScope<'a> {
    evaluator: &'a dyn Evaluator,
    events: &'a dyn EventApi,
    instance: &'a Event,
    was_interactive: bool,
    saved_status: ExitStatus,
}

impl<'a> InvocationScope<'a> {
    pub fn enter(evaluator: &'a dyn Evaluator, events: &'a dyn EventApi, instance: &'a Event) -> Self {
        let was_interactive = evaluator.is_interactive();
        let saved_status = evaluator.last_status();
        evaluator.set_interactive(false);
        Self {
            evaluator,
            events,
            instance,
            was_interactive,
            saved_status,
        }
    }

    /// The instance that caused this invocation
    #[inline]
    pub fn event(&self) -> &Event {
        self.instance
    }

    /// Event API for handler bodies that register, remove or fire
    #[inline]
    pub fn events(&self) -> &dyn EventApi {
        self.events
    }
}

impl Drop for InvocationScope<'_> {
    fn drop(&mut self) {
        self.evaluator.set_interactive(self.was_interactive);
        self.evaluator.set_last_status(self.saved_status);
    }
}
