use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters tracking intake outcomes.
///
/// All counters use relaxed ordering. For a consistent point-in-time view,
/// call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct IntakeMetrics {
    /// Submissions received.
    pub submitted: AtomicU64,
    /// Submissions rejected by validation.
    pub rejected: AtomicU64,
    /// Cases created.
    pub cases_created: AtomicU64,
    /// Submissions that failed while creating the case row.
    pub case_failures: AtomicU64,
    /// Files uploaded and registered.
    pub attachments_stored: AtomicU64,
    /// Files whose upload failed.
    pub upload_failures: AtomicU64,
    /// Files uploaded but not registered.
    pub registration_failures: AtomicU64,
}

impl IntakeMetrics {
    pub fn increment_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cases_created(&self) {
        self.cases_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_case_failures(&self) {
        self.case_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_attachments_stored(&self) {
        self.attachments_stored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_upload_failures(&self) {
        self.upload_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_registration_failures(&self) {
        self.registration_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> IntakeMetricsSnapshot {
        IntakeMetricsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            cases_created: self.cases_created.load(Ordering::Relaxed),
            case_failures: self.case_failures.load(Ordering::Relaxed),
            attachments_stored: self.attachments_stored.load(Ordering::Relaxed),
            upload_failures: self.upload_failures.load(Ordering::Relaxed),
            registration_failures: self.registration_failures.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`IntakeMetrics`] at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntakeMetricsSnapshot {
    pub submitted: u64,
    pub rejected: u64,
    pub cases_created: u64,
    pub case_failures: u64,
    pub attachments_stored: u64,
    pub upload_failures: u64,
    pub registration_failures: u64,
}
