//! Storage backend selection from environment variables.

use std::sync::Arc;

use crate::local::LocalMediaStore;
use crate::s3::{S3MediaStore, S3Settings};
use crate::traits::{MediaStore, StorageResult};

/// Which media backend to run and how to reach it.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local {
        dir: String,
        public_base_url: String,
    },
    S3(S3Settings),
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                   | Default                       |
    /// |---------------------------|-------------------------------|
    /// | `STORAGE_BACKEND`         | `local` (`local` or `s3`)     |
    /// | `STORAGE_LOCAL_DIR`       | `storage`                     |
    /// | `STORAGE_PUBLIC_BASE_URL` | `http://localhost:3000/media` |
    /// | `S3_REGION`               | `us-east-1`                   |
    /// | `S3_ENDPOINT_URL`         | unset                         |
    /// | `S3_FORCE_PATH_STYLE`     | `true`                        |
    /// | `S3_PUBLIC_BASE_URL`      | required for `s3`             |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend or when `S3_PUBLIC_BASE_URL` is missing
    /// for the `s3` backend.
    pub fn from_env() -> Self {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into());

        match backend.as_str() {
            "local" => Self::Local {
                dir: std::env::var("STORAGE_LOCAL_DIR").unwrap_or_else(|_| "storage".into()),
                public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/media".into()),
            },
            "s3" => Self::S3(S3Settings {
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
                endpoint_url: std::env::var("S3_ENDPOINT_URL")
                    .ok()
                    .filter(|s| !s.is_empty()),
                force_path_style: std::env::var("S3_FORCE_PATH_STYLE")
                    .map(|v| v != "false")
                    .unwrap_or(true),
                public_base_url: std::env::var("S3_PUBLIC_BASE_URL")
                    .expect("S3_PUBLIC_BASE_URL must be set when STORAGE_BACKEND=s3"),
            }),
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        }
    }

    /// Directory to serve at `/media`, when the local backend is active.
    pub fn local_dir(&self) -> Option<&str> {
        match self {
            Self::Local { dir, .. } => Some(dir),
            Self::S3(_) => None,
        }
    }

    /// Construct the configured backend.
    pub async fn build(&self) -> StorageResult<Arc<dyn MediaStore>> {
        match self {
            Self::Local {
                dir,
                public_base_url,
            } => {
                let store = LocalMediaStore::new(dir, public_base_url.clone()).await?;
                tracing::info!(dir = %dir, "Using local media store");
                Ok(Arc::new(store))
            }
            Self::S3(settings) => Ok(Arc::new(S3MediaStore::new(settings).await)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_backend_builds_bucket_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::Local {
            dir: dir.path().to_string_lossy().into_owned(),
            public_base_url: "http://localhost:3000/media".to_string(),
        };

        let store = config.build().await.unwrap();
        assert_eq!(
            store.public_url(crate::Bucket::Models, "a.png"),
            "http://localhost:3000/media/models/a.png"
        );
        assert!(dir.path().join("processed").is_dir());
        assert!(config.local_dir().is_some());
    }
}
