use std::{
    future::Future,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use futures::{stream::FuturesUnordered, StreamExt as _};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file_name} is not a supported image")]
    UnsupportedFormat { file_name: String },
}

/// A local image selected for upload, with its preview.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    /// `data:` URL of the file contents.
    pub preview: String,
}

impl StagedImage {
    /// Detects the image format from the bytes and builds the preview
    /// synchronously. Nothing is decoded or resized.
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: Bytes,
    ) -> Result<Self, StageError> {
        let file_name = file_name.into();

        let Ok(format) = image::guess_format(&bytes) else {
            return Err(StageError::UnsupportedFormat { file_name });
        };
        let content_type = format.to_mime_type().to_string();
        let preview =
            format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes));

        Ok(Self {
            file_name,
            content_type,
            bytes,
            preview,
        })
    }

    pub async fn read(path: &Path) -> Result<Self, StageError> {
        let bytes =
            tokio::fs::read(path)
                .await
                .map_err(|source| StageError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_bytes(file_name, Bytes::from(bytes))
    }
}

/// Reads every selected file concurrently. The result is in selection
/// order and a failed read does not affect the others.
pub async fn stage_files(
    paths: &[PathBuf],
) -> Vec<Result<StagedImage, StageError>> {
    fill_slots(paths.iter().enumerate().map(|(index, path)| async move {
        let result = StagedImage::read(path).await;
        match &result {
            Ok(staged) => debug!(
                task = "stage",
                index,
                file_name = staged.file_name,
                content_type = staged.content_type
            ),
            Err(e) => warn!(task = "stage", index, err = e.to_string()),
        }
        result
    }))
    .await
}

/// Runs the futures concurrently. One slot is reserved per future up front
/// and each output fills the slot of its original index, whatever order the
/// futures finish in.
async fn fill_slots<T, F>(futures: impl IntoIterator<Item = F>) -> Vec<T>
where
    F: Future<Output = T>,
{
    let mut running: FuturesUnordered<_> = futures
        .into_iter()
        .enumerate()
        .map(|(index, future)| async move { (index, future.await) })
        .collect();

    let mut slots: Vec<Option<T>> = (0..running.len()).map(|_| None).collect();
    while let Some((index, output)) = running.next().await {
        slots[index] = Some(output);
    }

    slots.into_iter().flatten().collect()
}
