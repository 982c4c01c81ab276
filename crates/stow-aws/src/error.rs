use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use stow_core::{ObjectStoreError, QueueError};

// --- Mapping helpers ---

/// Maps an SQS SDK failure onto [`QueueError`] by service error code.
pub(crate) fn queue_error<E>(err: SdkError<E>) -> QueueError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    match err.code() {
        Some("AWS.SimpleQueueService.NonExistentQueue" | "QueueDoesNotExist") => {
            QueueError::QueueNotFound(message)
        }
        Some("ReceiptHandleIsInvalid" | "InvalidParameterValue") => {
            QueueError::InvalidReceiptHandle(message)
        }
        Some(_) => QueueError::Rejected(message),
        None => QueueError::Transport(message),
    }
}

/// Maps an S3 SDK failure onto [`ObjectStoreError`] by service error code.
///
/// The SQS and S3 crates re-export the same smithy error types, so one set of
/// imports serves both.
pub(crate) fn object_store_error<E>(err: SdkError<E>, bucket: &str, key: &str) -> ObjectStoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    match err.code() {
        Some("NoSuchKey" | "NotFound") => ObjectStoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        Some("NoSuchBucket") => ObjectStoreError::BucketNotFound(bucket.to_string()),
        Some("AccessDenied" | "Forbidden") => ObjectStoreError::AccessDenied(message),
        _ => ObjectStoreError::Transport(message),
    }
}
