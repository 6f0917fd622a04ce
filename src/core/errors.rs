/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use crate::core::types::SignalNumber;
use miette::Diagnostic;
use thiserror::Error;

/// Event subsystem operation result
pub type EventResult<T> = Result<T, EventError>;

/// Errors raised by event collaborators
///
/// Dispatcher operations themselves are total; these errors only surface
/// from the OS-facing pieces and are logged, not propagated, by the core.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum EventError {
    #[error("Invalid signal: {0}")]
    #[diagnostic(
        code(events::invalid_signal),
        help("Signal numbers must name a signal the platform supports.")
    )]
    InvalidSignal(SignalNumber),

    #[error("Failed to change disposition of signal {signal}: {source}")]
    #[diagnostic(
        code(events::disposition_failed),
        help("SIGKILL and SIGSTOP cannot be caught. Check the signal number.")
    )]
    DispositionFailed {
        signal: SignalNumber,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("A process-wide signal channel is already installed")]
    #[diagnostic(
        code(events::channel_installed),
        help("Install the signal channel once, at shell startup.")
    )]
    ChannelAlreadyInstalled,
}
