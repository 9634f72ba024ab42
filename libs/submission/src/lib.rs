//! Turns a draft post into stored images and a single persisted post
//! record.
//!
//! The pipeline runs in three steps: validation (no I/O), a concurrent
//! upload of every staged image, and one atomic record creation once every
//! image has a durable URL. A post is either absent or present with all of
//! its images.

mod draft;
mod error;
mod pipeline;
mod staging;
mod validation;

pub use draft::{normalize_hashtag, sanitize_hashtags, Draft, DraftImage, PostFields};
pub use error::{FailedUpload, SubmissionError};
pub use pipeline::{SubmissionPipeline, DEFAULT_PREFIX};
pub use staging::{stage_files, StageError, StagedImage};
pub use validation::{validate, ValidationError};

/// Fewest images a post may carry.
pub const MIN_IMAGES: usize = 1;
/// Most images a post may carry.
pub const MAX_IMAGES: usize = 5;
