use async_trait::async_trait;

use crate::error::ObjectStoreResult;

/// Object store primitives. Implementations must be thread-safe.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `bucket`/`key`, replacing any existing object.
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> ObjectStoreResult<()>;

    /// Fetch the full object body.
    async fn get_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<Vec<u8>>;

    /// Remove an object. Deleting a missing object is not an error.
    async fn delete_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<()>;
}
