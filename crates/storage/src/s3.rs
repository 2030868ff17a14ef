//! S3-compatible backend (AWS S3, Supabase Storage, MinIO).
//!
//! Each [`Bucket`] maps to an S3 bucket of the same name. Public URLs are
//! `{public_base_url}/{bucket}/{key}`, so the buckets must allow public reads.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use vline_core::naming::generate_object_name;

use crate::bucket::Bucket;
use crate::traits::{join_url, MediaStore, StorageError, StorageResult, StoredObject};

/// Connection settings for the S3 backend.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub region: String,
    /// Custom endpoint for S3-compatible providers.
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct S3MediaStore {
    client: S3Client,
    public_base_url: String,
}

impl S3MediaStore {
    /// Build a client from the ambient AWS credentials and `settings`.
    pub async fn new(settings: &S3Settings) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()))
            .load()
            .await;

        let mut builder = S3ConfigBuilder::from(&aws_config);
        if let Some(ref endpoint_url) = settings.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        if settings.force_path_style {
            builder = builder.force_path_style(true);
        }

        tracing::info!(
            region = %settings.region,
            endpoint = ?settings.endpoint_url,
            "S3 media store initialized"
        );

        Self {
            client: S3Client::from_conf(builder.build()),
            public_base_url: settings.public_base_url.clone(),
        }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(
        &self,
        bucket: Bucket,
        original_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        if data.is_empty() {
            return Err(StorageError::EmptyPayload);
        }

        let key = generate_object_name(original_name);
        let size = data.len();
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(bucket.as_str())
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    %bucket,
                    key = %key,
                    size_bytes = size,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::debug!(
            %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis() as u64,
            "S3 upload successful"
        );

        Ok(StoredObject {
            bucket,
            url: self.public_url(bucket, &key),
            key,
        })
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        join_url(&self.public_base_url, bucket, key)
    }
}
