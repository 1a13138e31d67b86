use serde::Deserialize;

use lexcase_core::IntakeLimits;

/// Limits applied to each intake submission.
#[derive(Debug, Deserialize)]
pub struct IntakeConfig {
    /// Maximum number of files per case submission.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Maximum decoded size of a single file in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Files of one submission uploaded in parallel.
    #[serde(default = "default_max_concurrent_uploads")]
    pub max_concurrent_uploads: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_file_bytes: default_max_file_bytes(),
            max_concurrent_uploads: default_max_concurrent_uploads(),
        }
    }
}

impl IntakeConfig {
    /// Validation limits for the intake workflow.
    pub fn limits(&self) -> IntakeLimits {
        IntakeLimits {
            max_files: self.max_files,
            max_file_bytes: self.max_file_bytes,
        }
    }

    /// Largest JSON body a submission within these limits can produce.
    ///
    /// Files travel base64-encoded, so each grows by a third. A fixed
    /// allowance covers the text fields and JSON framing.
    pub fn request_body_limit(&self) -> usize {
        const ENVELOPE_BYTES: u64 = 64 * 1024;
        let encoded_file = self.max_file_bytes.div_ceil(3).saturating_mul(4);
        let files = encoded_file.saturating_mul(self.max_files as u64);
        usize::try_from(files.saturating_add(ENVELOPE_BYTES)).unwrap_or(usize::MAX)
    }
}

fn default_max_files() -> usize {
    IntakeLimits::default().max_files
}

fn default_max_file_bytes() -> u64 {
    IntakeLimits::default().max_file_bytes
}

fn default_max_concurrent_uploads() -> usize {
    4
}
