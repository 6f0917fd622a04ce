/*!
 * Event Configuration
 *
 * Runtime knobs for the dispatcher
 */

/// Event system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventConfig {
    /// Attach the signal's symbolic name as the single argument of every
    /// drained signal instance
    pub signal_arguments: bool,
    /// Emit a warning line when a drained signal buffer had overflowed
    pub warn_on_overflow: bool,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            signal_arguments: true,
            warn_on_overflow: true,
        }
    }
}

impl EventConfig {
    /// Configuration that keeps overflow accounting but never logs it
    pub const fn quiet() -> Self {
        Self {
            signal_arguments: true,
            warn_on_overflow: false,
        }
    }

    /// Configuration for hosts that bind signal handlers without arguments
    pub const fn bare_signals() -> Self {
        Self {
            signal_arguments: false,
            warn_on_overflow: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(EventConfig::default().warn_on_overflow);
        assert!(!EventConfig::quiet().warn_on_overflow);
        assert!(EventConfig::quiet().signal_arguments);
        assert!(!EventConfig::bare_signals().signal_arguments);
    }
}
