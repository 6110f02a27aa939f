//! Collaborators that surface audit events and user notifications through
//! `tracing` when no UI is attached.

use shared::domain::AuditEvent;
use tracing::{info, warn};

use crate::{AuditSink, Notifier, ToastOptions};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        info!(
            category = %event.category,
            action = %event.action,
            label = %event.label,
            value = event.value,
            "audit event"
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_error(&self, message: &str, options: &ToastOptions) {
        warn!(
            dedupe = options.dedupe,
            duration = ?options.duration,
            "notify: {message}"
        );
    }
}

#[cfg(test)]
#[path = "tests/audit_tests.rs"]
mod tests;
