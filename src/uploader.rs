//! Remote storage boundary.
//!
//! A confirmed photo is transferred to an S3-compatible object store under
//! the `images/` namespace as a single whole-file put. No chunking, no
//! resumption, no checksum verification; exactly one terminal outcome per
//! transfer.

use crate::config::UploadConfig;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Errors that can occur while uploading a photo.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Transfer failed: {0}")]
    Transfer(String),
}

/// Remote object store a photo can be transferred to.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Transfer the file at `local` to the store under `key`, reporting
    /// exactly one terminal outcome.
    async fn put(&self, local: &Path, key: &str) -> Result<(), UploadError>;
}

/// S3-backed remote storage.
pub struct S3Uploader {
    client: S3Client,
    bucket: String,
    key_prefix: String,
}

impl S3Uploader {
    /// Create a new S3 uploader
    pub async fn new(config: &UploadConfig) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let mut s3_config_builder = S3ConfigBuilder::from(&aws_config);

        // Configure custom endpoint for MinIO/LocalStack
        if let Some(ref endpoint_url) = config.endpoint_url {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint_url);
        }

        // Force path-style access for MinIO compatibility
        if config.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let client = S3Client::from_conf(s3_config_builder.build());

        info!(
            bucket = %config.bucket,
            region = %config.region,
            key_prefix = %config.key_prefix,
            "S3 uploader initialized"
        );

        Self {
            client,
            bucket: config.bucket.clone(),
            key_prefix: config.key_prefix.clone(),
        }
    }

    /// Object key under the logical namespace: `<prefix>/<sanitized key>`
    pub fn object_key(&self, key: &str) -> String {
        format!("{}/{}", self.key_prefix, sanitize_key_component(key))
    }
}

#[async_trait]
impl RemoteStorage for S3Uploader {
    #[instrument(skip(self), fields(key = %key, local = %local.display()))]
    async fn put(&self, local: &Path, key: &str) -> Result<(), UploadError> {
        let object_key = self.object_key(key);

        let bytes = tokio::fs::read(local)
            .await
            .map_err(|e| UploadError::Read(local.to_path_buf(), e))?;

        debug!(
            object_key = %object_key,
            size_bytes = bytes.len(),
            "Uploading photo"
        );

        let size_bytes = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes))
            .content_type("image/jpeg")
            .metadata("source-path", local.display().to_string())
            .send()
            .await
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        info!(
            object_key = %object_key,
            size_bytes = size_bytes,
            "Photo uploaded"
        );

        Ok(())
    }
}

/// Sanitize a key component to prevent path traversal
fn sanitize_key_component(component: &str) -> String {
    component
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect()
}
