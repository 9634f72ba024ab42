use std::sync::Arc;

use entity::prelude::*;
use futures::future::join_all;
use repository::PostStore;
use storage::{blob_path, BlobStore};
use tracing::{error, info, warn};

use crate::{
    draft::{sanitize_hashtags, Draft, DraftImage, PostFields},
    error::{FailedUpload, SubmissionError},
    validation::validate,
};

/// Storage path prefix for post images.
pub const DEFAULT_PREFIX: &str = "posts";

struct Uploaded {
    path: String,
    image: ImageEntity,
}

#[derive(Clone)]
pub struct SubmissionPipeline {
    blobs: Arc<dyn BlobStore>,
    posts: Arc<dyn PostStore>,
    prefix: String,
}

impl SubmissionPipeline {
    pub fn new(blobs: Arc<dyn BlobStore>, posts: Arc<dyn PostStore>) -> Self {
        Self {
            blobs,
            posts,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..self
        }
    }

    pub async fn submit_draft(
        &self,
        author: &str,
        draft: Draft,
    ) -> Result<PostId, SubmissionError> {
        let (fields, images) = draft.into_parts();
        self.submit(author, fields, images).await
    }

    /// Validates, uploads every image and then writes the post.
    ///
    /// Validation failures return before any storage call. If any upload
    /// fails no post is written; blobs that were stored stay behind and
    /// are logged.
    #[tracing::instrument(
        skip_all,
        fields(author = %author, title = %fields.title, images = images.len())
    )]
    pub async fn submit(
        &self,
        author: &str,
        fields: PostFields,
        images: Vec<DraftImage>,
    ) -> Result<PostId, SubmissionError> {
        validate(&fields, images.len())?;

        let uploaded = self.upload_all(&images).await?;

        self.commit(author, fields, uploaded).await
    }

    async fn upload_all(
        &self,
        images: &[DraftImage],
    ) -> Result<Vec<Uploaded>, SubmissionError> {
        let outcomes = join_all(
            images
                .iter()
                .enumerate()
                .map(|(index, image)| self.upload(index, image)),
        )
        .await;

        let mut uploaded = vec![];
        let mut failed = vec![];
        for outcome in outcomes {
            match outcome {
                Ok(image) => uploaded.push(image),
                Err(failure) => failed.push(failure),
            }
        }

        if failed.is_empty() {
            return Ok(uploaded);
        }

        let orphaned: Vec<String> = uploaded
            .into_iter()
            .map(|u| u.path)
            .chain(failed.iter().filter(|f| f.stored).map(|f| f.path.clone()))
            .collect();
        for failure in &failed {
            error!(task = "upload", err = failure.to_string());
        }
        for path in &orphaned {
            warn!(task = "upload", orphaned_blob = %path, "blob has no post");
        }

        Err(SubmissionError::Upload {
            failed,
            total: images.len(),
            orphaned,
        })
    }

    async fn upload(
        &self,
        index: usize,
        image: &DraftImage,
    ) -> Result<Uploaded, FailedUpload> {
        let staged = &image.staged;
        let path = blob_path(&self.prefix, &staged.file_name);
        let failure = |stored, error| FailedUpload {
            index,
            file_name: staged.file_name.clone(),
            path: path.clone(),
            stored,
            error,
        };

        let handle = self
            .blobs
            .store(staged.bytes.clone(), &staged.content_type, &path)
            .await
            .map_err(|e| failure(false, e))?;
        let url = self
            .blobs
            .resolve_url(&handle)
            .await
            .map_err(|e| failure(true, e))?;

        Ok(Uploaded {
            path,
            image: ImageEntity {
                url,
                link: image.link.clone(),
            },
        })
    }

    async fn commit(
        &self,
        author: &str,
        fields: PostFields,
        uploaded: Vec<Uploaded>,
    ) -> Result<PostId, SubmissionError> {
        let (paths, images): (Vec<_>, Vec<_>) =
            uploaded.into_iter().map(|u| (u.path, u.image)).unzip();
        let urls = images.iter().map(|i| i.url.clone()).collect();

        let post = NewPostEntity {
            title: fields.title.trim().to_string(),
            description: fields.description,
            category: fields.category,
            hashtags: sanitize_hashtags(fields.hashtags),
            images,
            created_by: author.to_string(),
            views: 0,
        };

        match self.posts.create(post).await {
            Ok(id) => {
                info!(task = "commit", post_id = %id);
                Ok(id)
            }
            Err(e) => {
                error!(task = "commit", err = format!("{:#}", e));
                for path in &paths {
                    warn!(task = "commit", orphaned_blob = %path, "blob has no post");
                }
                Err(SubmissionError::Commit {
                    uploaded: urls,
                    source: e,
                })
            }
        }
    }
}
