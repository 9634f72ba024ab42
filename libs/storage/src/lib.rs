use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

mod s3;

pub use s3::{S3BlobStore, StorageConfig};

/// Opaque reference to a stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHandle {
    pub key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to store blob {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: aws_sdk_s3::Error,
    },

    #[error("failed to resolve url for blob {key}: {message}")]
    ResolveUrl { key: String, message: String },

    #[error("blob store rejected {key}: {message}")]
    Rejected { key: String, message: String },
}

/// Durable blob storage addressed by caller-chosen paths.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(
        &self,
        blob: Bytes,
        content_type: &str,
        path: &str,
    ) -> Result<BlobHandle, StorageError>;

    async fn resolve_url(
        &self,
        handle: &BlobHandle,
    ) -> Result<String, StorageError>;
}

/// Unique storage path for an uploaded file. Two uploads of the same file
/// name never share a path.
pub fn blob_path(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let name = sanitize_file_name(file_name);

    if prefix.is_empty() {
        format!("{}-{}", Uuid::new_v4(), name)
    } else {
        format!("{}/{}-{}", prefix, Uuid::new_v4(), name)
    }
}

fn sanitize_file_name(file_name: &str) -> String {
    let name: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() {
        "blob".to_string()
    } else {
        name
    }
}
