/*!
 * Core Types
 * Common types shared by the event subsystem
 */

/// Raw OS signal number
pub type SignalNumber = i32;

/// Process ID type
pub type Pid = u32;

/// Job ID as shown to the user (`%1`, `%2`, ...)
pub type JobId = u32;

/// Exit status of the last command, as seen by `$status`
pub type ExitStatus = i32;

/// Handle identifying one registered handler for its whole lifetime
pub type HandlerId = u64;

/// Job information exposed by the job/process lookup collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub id: JobId,
    pub command: String,
}

impl JobInfo {
    pub fn new(id: JobId, command: impl Into<String>) -> Self {
        Self {
            id,
            command: command.into(),
        }
    }
}
