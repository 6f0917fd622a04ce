/*!
 * Shell Events - Demo Entry Point
 *
 * Wires the event system to the real process signal disposition, raises a
 * signal at itself and drains it through a logging evaluator.
 */

use miette::IntoDiagnostic;
use nix::sys::signal::{raise, Signal as NixSignal};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

use shell_events::core::{ExitStatus, JobId, JobInfo, Pid, SignalNumber};
use shell_events::{
    init_tracing, install_signal_channel, BlockStack, Evaluator, Event, EventApi, EventBlockSet,
    EventConfig, EventDispatch, EventResult, EventSystem, HandlerRegistry, InvocationScope,
    JobLookup, OsSignalDisposition, SignalChannel, SignalDescriber, SignalDisposition,
    SignalTable,
};

/// Minimal shell: logs every command it is asked to evaluate
#[derive(Default)]
struct DemoShell {
    state: Mutex<DemoState>,
    disposition: OsSignalDisposition,
    signals: SignalTable,
}

#[derive(Default)]
struct DemoState {
    interactive: bool,
    status: ExitStatus,
}

impl Evaluator for DemoShell {
    fn eval(&self, command: &str, scope: &InvocationScope<'_>) -> ExitStatus {
        info!(
            command,
            event = %scope.events().describe(scope.event()),
            "Running handler"
        );
        0
    }

    fn is_interactive(&self) -> bool {
        self.state.lock().interactive
    }

    fn set_interactive(&self, interactive: bool) {
        self.state.lock().interactive = interactive;
    }

    fn last_status(&self) -> ExitStatus {
        self.state.lock().status
    }

    fn set_last_status(&self, status: ExitStatus) {
        self.state.lock().status = status;
    }
}

impl SignalDisposition for DemoShell {
    fn set_catching(&self, signal: SignalNumber, enabled: bool) -> EventResult<()> {
        self.disposition.set_catching(signal, enabled)
    }
}

impl SignalDescriber for DemoShell {
    fn signal_name(&self, signal: SignalNumber) -> String {
        self.signals.signal_name(signal)
    }

    fn signal_description(&self, signal: SignalNumber) -> String {
        self.signals.signal_description(signal)
    }
}

impl JobLookup for DemoShell {
    fn job_by_pgid(&self, _pgid: Pid) -> Option<JobInfo> {
        None
    }

    fn job_by_id(&self, _job_id: JobId) -> Option<JobInfo> {
        None
    }
}

impl BlockStack for DemoShell {
    fn block_count(&self) -> usize {
        0
    }

    fn block_suppression(&self, _depth: usize) -> EventBlockSet {
        EventBlockSet::empty()
    }

    fn global_suppression(&self) -> EventBlockSet {
        EventBlockSet::empty()
    }
}

fn main() -> miette::Result<()> {
    init_tracing();

    info!("Shell events demo starting...");

    let channel = Arc::new(SignalChannel::new());
    install_signal_channel(channel.clone())?;

    let events = EventSystem::with_channel(DemoShell::default(), EventConfig::default(), channel);

    let usr1 = NixSignal::SIGUSR1 as SignalNumber;
    events.add_handler(&Event::signal(usr1).with_handler("on_usr1"));
    events.add_handler(&Event::generic("prompt_ready").with_handler("show_prompt"));

    raise(NixSignal::SIGUSR1).into_diagnostic()?;
    events.drain();

    events.fire_generic("prompt_ready", vec!["demo".to_string()]);

    let mut handlers = Vec::new();
    events.query(&Event::any(), Some(&mut handlers));
    for handler in &handlers {
        info!(handler = %handler.handler_name, "{}", events.describe(handler));
    }

    info!(stats = ?events.stats(), "Event statistics");

    events.remove(&Event::signal(usr1));
    let released = events.shutdown();
    info!(released, "Shell events demo finished");

    Ok(())
}
