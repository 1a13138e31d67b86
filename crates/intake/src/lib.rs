//! Case intake workflow.
//!
//! [`IntakeWorkflow::submit`] validates a request, creates the case row and
//! then uploads and registers each attached file independently. A file that
//! fails to upload or register is logged and skipped; once the case exists
//! the submission always succeeds.

pub mod builder;
pub mod error;
pub mod metrics;
pub mod outcome;
pub mod workflow;

pub use builder::IntakeWorkflowBuilder;
pub use error::IntakeError;
pub use metrics::{IntakeMetrics, IntakeMetricsSnapshot};
pub use outcome::{FileOutcome, FileStatus, IntakeOutcome};
pub use workflow::IntakeWorkflow;
