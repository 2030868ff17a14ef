//! The media store abstraction shared by all backends.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::bucket::Bucket;

/// Media store failures. None of them are retried.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Refusing to store an empty file")]
    EmptyPayload,

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage configuration error: {0}")]
    Config(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub bucket: Bucket,
    pub key: String,
    pub url: String,
}

/// Storage backend for media files.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `data` in `bucket` under a freshly generated name that keeps the
    /// extension of `original_name`, returning its public URL.
    async fn upload(
        &self,
        bucket: Bucket,
        original_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject>;

    /// Public URL of an object. Does not check that the object exists.
    fn public_url(&self, bucket: Bucket, key: &str) -> String;
}

/// Join a base URL, bucket, and key without doubling slashes.
pub(crate) fn join_url(base_url: &str, bucket: Bucket, key: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), bucket, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_trims_trailing_slash() {
        assert_eq!(
            join_url("http://localhost:3000/media/", Bucket::Models, "1-abc.png"),
            "http://localhost:3000/media/models/1-abc.png"
        );
    }
}
