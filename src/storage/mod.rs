pub mod error;
pub mod s3;
pub mod uploader;

use crate::storage::error::StorageError;
use async_trait::async_trait;

/// Write side of an object store bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket objects are written to.
    fn bucket(&self) -> &str;

    /// Stores `body` under `key`, replacing any existing object with that key.
    async fn put_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;
}
