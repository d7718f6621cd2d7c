//! Notification sink for user-facing status messages.
//!
//! The gate's correctness never depends on a notification being delivered;
//! sinks only report what happened.

pub mod console;

pub use console::ConsoleNotifier;

use serde::Serialize;
use std::fmt;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Receives `(message, severity)` pairs.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Forwards notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => {
                tracing::info!(severity = %severity, "{}", message)
            }
            Severity::Warning => tracing::warn!(severity = %severity, "{}", message),
            Severity::Error => tracing::error!(severity = %severity, "{}", message),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}
