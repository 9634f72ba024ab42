use async_trait::async_trait;
use aws_sdk_s3::{config::Credentials, primitives::ByteStream};
use bytes::Bytes;
use tracing::{debug, info};

use crate::{BlobHandle, BlobStore, StorageError};

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub bucket: String,
    /// S3-compatible API endpoint.
    pub endpoint_url: String,
    /// Public base URL objects are served from.
    pub public_url: String,
    pub region: String,
}

#[derive(Clone, Debug)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
}

impl S3BlobStore {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: String,
        public_url: String,
    ) -> Self {
        Self {
            client,
            bucket,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn connect(
        config: StorageConfig,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> Self {
        info!(task = "connect blob storage", bucket = %config.bucket);

        let credentials =
            Credentials::new(access_key_id, secret_access_key, None, None, "");
        let cfg = aws_config::from_env()
            .endpoint_url(config.endpoint_url)
            .region(aws_config::Region::new(config.region))
            .credentials_provider(credentials)
            .load()
            .await;
        let client = aws_sdk_s3::Client::new(&cfg);

        Self::new(client, config.bucket, config.public_url)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn store(
        &self,
        blob: Bytes,
        content_type: &str,
        path: &str,
    ) -> Result<BlobHandle, StorageError> {
        debug!(task = "put object", key = path, size = blob.len());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .content_type(content_type)
            .key(path)
            .body(ByteStream::from(blob))
            .send()
            .await
            .map_err(|e| StorageError::Store {
                key: path.to_string(),
                source: e.into(),
            })?;

        Ok(BlobHandle {
            key: path.to_string(),
        })
    }

    async fn resolve_url(
        &self,
        handle: &BlobHandle,
    ) -> Result<String, StorageError> {
        if handle.key.is_empty() {
            return Err(StorageError::ResolveUrl {
                key: handle.key.clone(),
                message: "empty key".to_string(),
            });
        }

        Ok(format!("{}/{}", self.public_url, handle.key))
    }
}
