//! Terminal notifications for the CLI.

use std::io::Write;

use crate::notify::{Notifier, Severity};

/// Writes notifications to stderr, keeping stdout for command output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    /// Suppress `Info` messages.
    pub quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn prefix(severity: Severity) -> &'static str {
        match severity {
            Severity::Info => "..",
            Severity::Success => "ok",
            Severity::Warning => "!!",
            Severity::Error => "xx",
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        if self.quiet && severity == Severity::Info {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "[{}] {}", Self::prefix(severity), message);
    }
}
