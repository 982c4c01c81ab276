use tracing::info;

use super::ExtendedClient;
use crate::codec::{unwrap_receipt_handle, ObjectRef, UnwrappedHandle};
use crate::error::DeleteError;
use crate::message::DeleteMessageRequest;

impl ExtendedClient {
    /// Delete a message and the object holding its body.
    ///
    /// The queue only ever sees the original receipt handle. The object is
    /// removed after the queue delete succeeds; an object failure is reported
    /// as [`DeleteError::Object`] and does not undo the queue delete.
    #[tracing::instrument(skip_all, fields(queue_url = %request.queue_url))]
    pub async fn delete_message(&self, request: DeleteMessageRequest) -> Result<(), DeleteError> {
        let unwrapped = unwrap_receipt_handle(&request.receipt_handle);
        let target = self.object_target(&unwrapped)?;

        self.queue
            .delete_message(DeleteMessageRequest {
                queue_url: request.queue_url,
                receipt_handle: unwrapped.receipt_handle,
            })
            .await?;

        if let Some(target) = target {
            self.delete_object(&target).await?;
        }
        Ok(())
    }

    /// Remove only the object referenced by a wrapped receipt handle, leaving
    /// the queue untouched. Pass-through handles are a no-op.
    #[tracing::instrument(skip_all)]
    pub async fn cleanup(&self, receipt_handle: &str) -> Result<(), DeleteError> {
        let unwrapped = unwrap_receipt_handle(receipt_handle);
        if let Some(target) = self.object_target(&unwrapped)? {
            self.delete_object(&target).await?;
        }
        Ok(())
    }

    /// Object named by an unwrapped handle. Handles without bucket markers
    /// fall back to the configured bucket.
    fn object_target(&self, unwrapped: &UnwrappedHandle) -> Result<Option<ObjectRef>, DeleteError> {
        let Some(key) = &unwrapped.key else {
            return Ok(None);
        };
        let bucket = unwrapped
            .bucket
            .clone()
            .or_else(|| self.bucket_name.clone())
            .ok_or_else(|| DeleteError::MissingBucket { key: key.clone() })?;
        Ok(Some(ObjectRef::new(bucket, key.clone())))
    }

    async fn delete_object(&self, target: &ObjectRef) -> Result<(), DeleteError> {
        self.store
            .delete_object(&target.bucket, &target.key)
            .await
            .map_err(|source| DeleteError::Object {
                bucket: target.bucket.clone(),
                key: target.key.clone(),
                source,
            })?;
        info!(bucket = %target.bucket, key = %target.key, "deleted offloaded body");
        Ok(())
    }
}
