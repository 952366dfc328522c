//! Build reporter implementation
//!
//! All user-facing build output funnels through here so that silent mode
//! can suppress it in one place. Diagnostic logging goes through `tracing`
//! instead and is controlled by `RUST_LOG`, not by this reporter.

use console::style;
use std::time::Duration;

/// Reporter for build status output
pub struct BuildReporter {
    enabled: bool,
}

impl BuildReporter {
    /// Create an enabled reporter
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a disabled reporter (for silent mode)
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Create a reporter matching a silent flag
    pub fn from_silent(silent: bool) -> Self {
        if silent {
            Self::disabled()
        } else {
            Self::new()
        }
    }

    /// Whether output is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Print a status notice
    pub fn notice(&self, message: &str) {
        if self.enabled {
            println!("{}", style(message).dim());
        }
    }

    /// Print the final timing line
    pub fn finish(&self, elapsed: Duration) {
        if self.enabled {
            println!("{} {:.2?}", style("Built in").green().bold(), elapsed);
        }
    }
}

impl Default for BuildReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_state() {
        assert!(BuildReporter::new().is_enabled());
        assert!(!BuildReporter::disabled().is_enabled());
        assert!(!BuildReporter::from_silent(true).is_enabled());
        assert!(BuildReporter::from_silent(false).is_enabled());
    }

    #[test]
    fn test_disabled_reporter_is_quiet() {
        // Must not panic; output suppression is covered by the CLI tests
        let reporter = BuildReporter::disabled();
        reporter.notice("hidden");
        reporter.finish(Duration::from_millis(12));
    }
}
