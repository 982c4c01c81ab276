use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use stow_core::error::ObjectStoreResult;
use stow_core::{ObjectStore, ObjectStoreError};
use tracing::debug;

use crate::error::object_store_error;

/// [`ObjectStore`] backed by Amazon S3.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> ObjectStoreResult<()> {
        let bytes = body.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| object_store_error(e, bucket, key))?;
        debug!(bucket, key, bytes, "s3 put_object");
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| object_store_error(e, bucket, key))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| ObjectStoreError::Transport(format!("reading ({bucket}){key}: {e}")))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| object_store_error(e, bucket, key))?;
        debug!(bucket, key, "s3 delete_object");
        Ok(())
    }
}
