//! Media storage for product, model, and try-on images.
//!
//! Uploaded objects land in one of three [`Bucket`]s under a generated name
//! (`{unix_millis}-{suffix}.{ext}`, see [`vline_core::naming`]) and are
//! addressed afterwards only by their public URL.
//!
//! Two backends implement [`MediaStore`]: [`S3MediaStore`] for S3-compatible
//! object storage and [`LocalMediaStore`] for a directory on disk that the
//! API server exposes under `/media`.

pub mod bucket;
pub mod config;
pub mod local;
pub mod s3;
pub mod traits;

pub use bucket::Bucket;
pub use config::StorageConfig;
pub use local::LocalMediaStore;
pub use s3::S3MediaStore;
pub use traits::{MediaStore, StorageError, StorageResult, StoredObject};
