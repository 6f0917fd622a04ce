/*!
 * OS Signal Disposition
 * Routes real signals into the process-wide signal channel
 *
 * The trampoline installed with `sigaction` only touches the channel, which
 * is allocation-free and lock-free on the record path.
 */

use crate::core::errors::{EventError, EventResult};
use crate::core::types::SignalNumber;
use crate::events::channel::SignalChannel;
use crate::events::traits::SignalDisposition;
use super::table::Signal;
use nix::errno::Errno;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal as NixSignal};
use std::os::raw::c_int;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

static PROCESS_CHANNEL: OnceLock<Arc<SignalChannel>> = OnceLock::new();

/// Make `channel` the target of every signal caught by [`OsSignalDisposition`]
///
/// Can be done once per process; installing the same channel again is a
/// no-op.
pub fn install_signal_channel(channel: Arc<SignalChannel>) -> EventResult<()> {
    let installed = PROCESS_CHANNEL.get_or_init(|| channel.clone());
    if Arc::ptr_eq(installed, &channel) {
        info!("Process signal channel installed");
        Ok(())
    } else {
        Err(EventError::ChannelAlreadyInstalled)
    }
}

/// The process-wide channel, if one was installed
pub fn process_signal_channel() -> Option<Arc<SignalChannel>> {
    PROCESS_CHANNEL.get().cloned()
}

extern "C" fn catch_signal(signal: c_int) {
    if let Some(channel) = PROCESS_CHANNEL.get() {
        channel.record_if_observed(signal);
    }
}

/// Signal disposition backed by `sigaction`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSignalDisposition;

impl OsSignalDisposition {
    fn action(enabled: bool) -> SigAction {
        let handler = if enabled {
            SigHandler::Handler(catch_signal)
        } else {
            SigHandler::SigDfl
        };
        SigAction::new(handler, SaFlags::SA_RESTART, SigSet::empty())
    }
}

impl SignalDisposition for OsSignalDisposition {
    fn set_catching(&self, signal: SignalNumber, enabled: bool) -> EventResult<()> {
        let known = Signal::from_number(signal)?;
        if !known.can_catch() {
            return Err(EventError::DispositionFailed {
                signal,
                source: Errno::EINVAL,
            });
        }
        let nix_signal =
            NixSignal::try_from(signal).map_err(|_| EventError::InvalidSignal(signal))?;

        // SAFETY: the installed handler only performs atomic operations on a
        // channel that lives for the rest of the process
        unsafe { sigaction(nix_signal, &Self::action(enabled)) }
            .map_err(|source| EventError::DispositionFailed { signal, source })?;

        debug!(signal = %known, enabled, "Signal disposition changed");
        Ok(())
    }
}
