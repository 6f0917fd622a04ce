/*!
 * Signal Table
 * Standard signal numbers, names and descriptions
 */

use crate::core::errors::{EventError, EventResult};
use crate::core::types::SignalNumber;
use crate::events::traits::SignalDescriber;
use std::fmt;

/// Standard Linux signal numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Signal {
    /// Hangup detected on controlling terminal or death of controlling process
    SIGHUP = 1,
    /// Interrupt from keyboard (Ctrl+C)
    SIGINT = 2,
    /// Quit from keyboard (Ctrl+\)
    SIGQUIT = 3,
    SIGILL = 4,
    SIGTRAP = 5,
    SIGABRT = 6,
    SIGBUS = 7,
    SIGFPE = 8,
    /// Cannot be caught or ignored
    SIGKILL = 9,
    SIGUSR1 = 10,
    SIGSEGV = 11,
    SIGUSR2 = 12,
    SIGPIPE = 13,
    SIGALRM = 14,
    SIGTERM = 15,
    SIGSTKFLT = 16,
    /// Child process stopped or terminated
    SIGCHLD = 17,
    SIGCONT = 18,
    /// Cannot be caught or ignored
    SIGSTOP = 19,
    /// Stop typed at terminal (Ctrl+Z)
    SIGTSTP = 20,
    SIGTTIN = 21,
    SIGTTOU = 22,
    SIGURG = 23,
    SIGXCPU = 24,
    SIGXFSZ = 25,
    SIGVTALRM = 26,
    SIGPROF = 27,
    /// Window resize
    SIGWINCH = 28,
    SIGIO = 29,
    SIGPWR = 30,
    SIGSYS = 31,
}

impl Signal {
    /// Convert from signal number
    pub fn from_number(n: SignalNumber) -> EventResult<Self> {
        let signal = match n {
            1 => Signal::SIGHUP,
            2 => Signal::SIGINT,
            3 => Signal::SIGQUIT,
            4 => Signal::SIGILL,
            5 => Signal::SIGTRAP,
            6 => Signal::SIGABRT,
            7 => Signal::SIGBUS,
            8 => Signal::SIGFPE,
            9 => Signal::SIGKILL,
            10 => Signal::SIGUSR1,
            11 => Signal::SIGSEGV,
            12 => Signal::SIGUSR2,
            13 => Signal::SIGPIPE,
            14 => Signal::SIGALRM,
            15 => Signal::SIGTERM,
            16 => Signal::SIGSTKFLT,
            17 => Signal::SIGCHLD,
            18 => Signal::SIGCONT,
            19 => Signal::SIGSTOP,
            20 => Signal::SIGTSTP,
            21 => Signal::SIGTTIN,
            22 => Signal::SIGTTOU,
            23 => Signal::SIGURG,
            24 => Signal::SIGXCPU,
            25 => Signal::SIGXFSZ,
            26 => Signal::SIGVTALRM,
            27 => Signal::SIGPROF,
            28 => Signal::SIGWINCH,
            29 => Signal::SIGIO,
            30 => Signal::SIGPWR,
            31 => Signal::SIGSYS,
            _ => return Err(EventError::InvalidSignal(n)),
        };
        Ok(signal)
    }

    /// Get signal number
    #[inline]
    pub fn number(&self) -> SignalNumber {
        *self as SignalNumber
    }

    /// Check if signal can be caught
    pub fn can_catch(&self) -> bool {
        !matches!(self, Signal::SIGKILL | Signal::SIGSTOP)
    }

    /// Symbolic name
    pub fn name(&self) -> &'static str {
        match self {
            Signal::SIGHUP => "SIGHUP",
            Signal::SIGINT => "SIGINT",
            Signal::SIGQUIT => "SIGQUIT",
            Signal::SIGILL => "SIGILL",
            Signal::SIGTRAP => "SIGTRAP",
            Signal::SIGABRT => "SIGABRT",
            Signal::SIGBUS => "SIGBUS",
            Signal::SIGFPE => "SIGFPE",
            Signal::SIGKILL => "SIGKILL",
            Signal::SIGUSR1 => "SIGUSR1",
            Signal::SIGSEGV => "SIGSEGV",
            Signal::SIGUSR2 => "SIGUSR2",
            Signal::SIGPIPE => "SIGPIPE",
            Signal::SIGALRM => "SIGALRM",
            Signal::SIGTERM => "SIGTERM",
            Signal::SIGSTKFLT => "SIGSTKFLT",
            Signal::SIGCHLD => "SIGCHLD",
            Signal::SIGCONT => "SIGCONT",
            Signal::SIGSTOP => "SIGSTOP",
            Signal::SIGTSTP => "SIGTSTP",
            Signal::SIGTTIN => "SIGTTIN",
            Signal::SIGTTOU => "SIGTTOU",
            Signal::SIGURG => "SIGURG",
            Signal::SIGXCPU => "SIGXCPU",
            Signal::SIGXFSZ => "SIGXFSZ",
            Signal::SIGVTALRM => "SIGVTALRM",
            Signal::SIGPROF => "SIGPROF",
            Signal::SIGWINCH => "SIGWINCH",
            Signal::SIGIO => "SIGIO",
            Signal::SIGPWR => "SIGPWR",
            Signal::SIGSYS => "SIGSYS",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Signal::SIGHUP => "Hangup",
            Signal::SIGINT => "Interrupt",
            Signal::SIGQUIT => "Quit",
            Signal::SIGILL => "Illegal instruction",
            Signal::SIGTRAP => "Trace/breakpoint trap",
            Signal::SIGABRT => "Aborted",
            Signal::SIGBUS => "Bus error",
            Signal::SIGFPE => "Floating point exception",
            Signal::SIGKILL => "Killed",
            Signal::SIGUSR1 => "User defined signal 1",
            Signal::SIGSEGV => "Segmentation fault",
            Signal::SIGUSR2 => "User defined signal 2",
            Signal::SIGPIPE => "Broken pipe",
            Signal::SIGALRM => "Alarm clock",
            Signal::SIGTERM => "Terminated",
            Signal::SIGSTKFLT => "Stack fault",
            Signal::SIGCHLD => "Child status changed",
            Signal::SIGCONT => "Continued",
            Signal::SIGSTOP => "Stopped (signal)",
            Signal::SIGTSTP => "Stopped",
            Signal::SIGTTIN => "Stopped (tty input)",
            Signal::SIGTTOU => "Stopped (tty output)",
            Signal::SIGURG => "Urgent I/O condition",
            Signal::SIGXCPU => "CPU time limit exceeded",
            Signal::SIGXFSZ => "File size limit exceeded",
            Signal::SIGVTALRM => "Virtual timer expired",
            Signal::SIGPROF => "Profiling timer expired",
            Signal::SIGWINCH => "Window size changed",
            Signal::SIGIO => "I/O possible",
            Signal::SIGPWR => "Power failure",
            Signal::SIGSYS => "Bad system call",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.number())
    }
}

/// Signal describer backed by [`Signal`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalTable;

impl SignalDescriber for SignalTable {
    fn signal_name(&self, signal: SignalNumber) -> String {
        match Signal::from_number(signal) {
            Ok(known) => known.name().to_string(),
            Err(_) => format!("SIG{}", signal),
        }
    }

    fn signal_description(&self, signal: SignalNumber) -> String {
        match Signal::from_number(signal) {
            Ok(known) => known.description().to_string(),
            Err(_) => "Unknown signal".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_from_number() {
        assert_eq!(Signal::from_number(1).unwrap(), Signal::SIGHUP);
        assert_eq!(Signal::from_number(15).unwrap(), Signal::SIGTERM);
        assert_eq!(Signal::from_number(99), Err(EventError::InvalidSignal(99)));
        assert!(Signal::from_number(0).is_err());
    }

    #[test]
    fn test_numbers_round_trip_through_table() {
        for n in 1..=31 {
            assert_eq!(Signal::from_number(n).unwrap().number(), n);
        }
    }

    #[test]
    fn test_uncatchable() {
        assert!(!Signal::SIGKILL.can_catch());
        assert!(!Signal::SIGSTOP.can_catch());
        assert!(Signal::SIGINT.can_catch());
    }

    #[test]
    fn test_table_fallbacks() {
        assert_eq!(SignalTable.signal_name(2), "SIGINT");
        assert_eq!(SignalTable.signal_description(2), "Interrupt");
        assert_eq!(SignalTable.signal_name(40), "SIG40");
        assert_eq!(SignalTable.signal_description(40), "Unknown signal");
        assert_eq!(Signal::SIGUSR1.to_string(), "SIGUSR1(10)");
    }
}
