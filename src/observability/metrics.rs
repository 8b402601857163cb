//! # Metrics Collection
//!
//! Counters for authentication outcomes and directory mutations.

use metrics::counter;

/// Thin wrapper over the `metrics` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Record an authentication attempt outcome (login or bearer check)
    pub fn record_authentication(&self, kind: &str, status: &str) {
        counter!("auth_authentications_total").increment(1);
        let labels = [("kind", kind.to_string()), ("status", status.to_string())];
        counter!("auth_authentications_total", &labels).increment(1);
    }

    /// Record a write to the staff directory
    pub fn record_staff_mutation(&self, operation: &str) {
        let labels = [("operation", operation.to_string())];
        counter!("staff_mutations_total", &labels).increment(1);
    }
}

/// Record a login outcome
pub fn record_login(status: &str) {
    MetricsRecorder.record_authentication("login", status);
}

/// Record a bearer-token check outcome
pub fn record_authentication(status: &str) {
    MetricsRecorder.record_authentication("bearer", status);
}

pub fn record_staff_mutation(operation: &str) {
    MetricsRecorder.record_staff_mutation(operation);
}
