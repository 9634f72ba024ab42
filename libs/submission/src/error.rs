use std::fmt;

use storage::StorageError;

use crate::validation::ValidationError;

/// An image whose upload did not produce a URL.
#[derive(Debug)]
pub struct FailedUpload {
    /// Position in the submitted image list.
    pub index: usize,
    pub file_name: String,
    pub path: String,
    /// The blob was written but its URL could not be resolved.
    pub stored: bool,
    pub error: StorageError,
}

impl fmt::Display for FailedUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image {} ({}): {}", self.index, self.file_name, self.error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationError),

    #[error(
        "{} of {} image uploads failed: {}",
        .failed.len(),
        .total,
        .failed.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Upload {
        failed: Vec<FailedUpload>,
        total: usize,
        /// Paths written by the uploads that did succeed.
        orphaned: Vec<String>,
    },

    #[error("failed to create post after uploading {} images: {source}", .uploaded.len())]
    Commit {
        uploaded: Vec<String>,
        #[source]
        source: anyhow::Error,
    },
}

impl SubmissionError {
    /// True when the author can fix the problem by editing the form.
    /// Everything else is an infrastructure failure.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, SubmissionError::Validation(_))
    }

    pub fn failed_uploads(&self) -> &[FailedUpload] {
        match self {
            SubmissionError::Upload { failed, .. } => failed,
            _ => &[],
        }
    }
}
