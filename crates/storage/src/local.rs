//! Local filesystem backend: `{root}/{bucket}/{key}`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use vline_core::naming::generate_object_name;

use crate::bucket::Bucket;
use crate::traits::{join_url, MediaStore, StorageError, StorageResult, StoredObject};

/// Stores media on local disk. The API serves `root` at `/media`, so
/// `public_base_url` normally ends in `/media`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    /// Create the store, making sure every bucket directory exists.
    pub async fn new(root: impl Into<PathBuf>, public_base_url: String) -> StorageResult<Self> {
        let root = root.into();
        for bucket in Bucket::ALL {
            let dir = root.join(bucket.as_str());
            fs::create_dir_all(&dir).await.map_err(|e| {
                StorageError::Config(format!(
                    "Failed to create storage directory {}: {e}",
                    dir.display()
                ))
            })?;
        }
        Ok(Self {
            root,
            public_base_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: Bucket, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.contains('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(bucket.as_str()).join(key))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(
        &self,
        bucket: Bucket,
        original_name: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<StoredObject> {
        if data.is_empty() {
            return Err(StorageError::EmptyPayload);
        }

        let key = generate_object_name(original_name);
        let path = self.object_path(bucket, &key)?;
        let size = data.len();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {e}", path.display()))
        })?;
        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {e}", path.display()))
        })?;
        file.sync_all().await?;

        tracing::debug!(%bucket, key = %key, size_bytes = size, "Stored media on local disk");

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
