/*!
 * Test Host
 * Recording shell collaborators for integration tests
 */

#![allow(dead_code)]

use parking_lot::Mutex;
use shell_events::core::{ExitStatus, JobId, JobInfo, Pid, SignalNumber};
use shell_events::{
    BlockStack, Evaluator, Event, EventBlockSet, EventResult, InvocationScope, JobLookup,
    OsSignalDisposition, SignalDescriber, SignalDisposition, SignalTable,
};

/// Status every recorded evaluation finishes with
pub const HANDLER_STATUS: ExitStatus = 42;

/// Everything the host has observed plus the state it exposes
#[derive(Debug, Default)]
pub struct Recorded {
    pub commands: Vec<String>,
    pub instances: Vec<Event>,
    /// Interactive mode seen by each evaluation
    pub interactive_during_eval: Vec<bool>,
    pub dispositions: Vec<(SignalNumber, bool)>,
    pub blocks: Vec<EventBlockSet>,
    pub global: EventBlockSet,
    pub interactive: bool,
    pub status: ExitStatus,
    pub jobs: Vec<JobInfo>,
    pub job_pgids: Vec<(Pid, JobId)>,
}

type Hook = Box<dyn Fn(&Mutex<Recorded>, &str, &InvocationScope<'_>) + Send + Sync>;

/// Shell host that records calls instead of doing them
#[derive(Default)]
pub struct RecordingHost {
    pub state: Mutex<Recorded>,
    hook: Option<Hook>,
    /// Also change the real process disposition
    os_dispositions: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` inside every evaluation, after it is recorded
    pub fn with_hook<F>(hook: F) -> Self
    where
        F: Fn(&Mutex<Recorded>, &str, &InvocationScope<'_>) + Send + Sync + 'static,
    {
        Self {
            hook: Some(Box::new(hook)),
            ..Self::default()
        }
    }

    /// Record dispositions and apply them to the process
    pub fn with_os_dispositions() -> Self {
        Self {
            os_dispositions: true,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.lock().commands.clone()
    }

    pub fn dispositions(&self) -> Vec<(SignalNumber, bool)> {
        self.state.lock().dispositions.clone()
    }

    pub fn set_blocks(&self, blocks: Vec<EventBlockSet>) {
        self.state.lock().blocks = blocks;
    }

    pub fn set_global(&self, global: EventBlockSet) {
        self.state.lock().global = global;
    }
}

impl Evaluator for RecordingHost {
    fn eval(&self, command: &str, scope: &InvocationScope<'_>) -> ExitStatus {
        {
            let mut state = self.state.lock();
            state.commands.push(command.to_string());
            state.instances.push(scope.event().clone());
            let interactive = state.interactive;
            state.interactive_during_eval.push(interactive);
            state.status = HANDLER_STATUS;
        }
        if let Some(hook) = &self.hook {
            hook(&self.state, command, scope);
        }
        HANDLER_STATUS
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

impl SignalDisposition for RecordingHost {
    fn set_catching(&self, signal: SignalNumber, enabled: bool) -> EventResult<()> {
        self.state.lock().dispositions.push((signal, enabled));
        if self.os_dispositions {
            OsSignalDisposition.set_catching(signal, enabled)?;
        }
        Ok(())
    }
}

impl SignalDescriber for RecordingHost {
    fn signal_name(&self, signal: SignalNumber) -> String {
        SignalTable.signal_name(signal)
    }

    fn signal_description(&self, signal: SignalNumber) -> String {
        SignalTable.signal_description(signal)
    }
}

impl JobLookup for RecordingHost {
    fn job_by_pgid(&self, pgid: Pid) -> Option<JobInfo> {
        let state = self.state.lock();
        let job_id = state
            .job_pgids
            .iter()
            .find(|(candidate, _)| *candidate == pgid)
            .map(|(_, id)| *id)?;
        state.jobs.iter().find(|job| job.id == job_id).cloned()
    }

    fn job_by_id(&self, job_id: JobId) -> Option<JobInfo> {
        self.state
            .lock()
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .cloned()
    }
}

impl BlockStack for RecordingHost {
    fn block_count(&self) -> usize {
        self.state.lock().blocks.len()
    }

    fn block_suppression(&self, depth: usize) -> EventBlockSet {
        let state = self.state.lock();
        // Innermost block is the last one pushed
        state
            .blocks
            .iter()
            .rev()
            .nth(depth)
            .copied()
            .unwrap_or_default()
    }

    fn global_suppression(&self) -> EventBlockSet {
        self.state.lock().global
    }
}
