/*!
 * Event Descriptions
 * Human-readable rendering of handlers for listings and diagnostics
 */

use super::traits::{JobLookup, SignalDescriber};
use super::types::{Event, EventType, ExitTarget, SignalSpec};

/// Describe `event`, resolving jobs and signal names through `host`
pub fn describe_event<H>(host: &H, event: &Event) -> String
where
    H: SignalDescriber + JobLookup + ?Sized,
{
    match &event.ty {
        EventType::Signal(SignalSpec::Number(signal)) => format!(
            "signal handler for {} ({})",
            host.signal_name(*signal),
            host.signal_description(*signal)
        ),
        EventType::Signal(SignalSpec::Any) => "signal handler for any signal".to_string(),
        EventType::Variable(name) => format!("handler for variable '{}'", name),
        EventType::ProcessExit(ExitTarget::Process(pid)) => {
            format!("exit handler for process {}", pid)
        }
        EventType::ProcessExit(ExitTarget::ProcessGroup(pgid)) => match host.job_by_pgid(*pgid) {
            Some(job) => format!("exit handler for job {}, '{}'", job.id, job.command),
            None => format!("exit handler for job with process group {}", pgid),
        },
        EventType::ProcessExit(ExitTarget::Any) => "exit handler for any process".to_string(),
        EventType::JobExit(job_id) => match host.job_by_id(*job_id) {
            Some(job) => format!("exit handler for job {}, '{}'", job.id, job.command),
            None => format!("exit handler for job with job id {}", job_id),
        },
        EventType::Generic(name) => format!("handler for generic event '{}'", name),
        EventType::Any => "Unknown event type".to_string(),
    }
}
