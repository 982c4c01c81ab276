/// Failures reported by a [`Queue`](crate::queue::Queue) implementation.
///
/// This is the "infra" error for the queue side: every per-operation error
/// that talks to the queue embeds it via `#[from]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("queue not found: {0}")]
    QueueNotFound(String),

    #[error("invalid receipt handle: {0}")]
    InvalidReceiptHandle(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("queue transport error: {0}")]
    Transport(String),
}

/// Failures reported by an [`ObjectStore`](crate::store::ObjectStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("object not found: ({bucket}){key}")]
    NotFound { bucket: String, key: String },

    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("object store transport error: {0}")]
    Transport(String),
}

/// Errors from parsing the reserved message attribute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed object reference: {0:?}")]
    MalformedReference(String),
}

// --- Per-operation error types ---

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("no bucket configured for offloaded message bodies")]
    MissingBucket,

    /// The caller set the reserved attribute without a string reference.
    #[error(transparent)]
    Malformed(#[from] CodecError),

    #[error("failed to upload message body to ({bucket}){key}: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: ObjectStoreError,
    },

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Failure of the batch-level receive call. Per-message failures are carried
/// by [`ResolveError`] inside the returned batch.
#[derive(Debug, thiserror::Error)]
pub enum ReceiveError {
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Failure to reconstruct the body of a single offloaded message or record.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Malformed(#[from] CodecError),

    #[error("failed to fetch message body from ({bucket}){key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: ObjectStoreError,
    },

    #[error("message body at ({bucket}){key} is not valid UTF-8")]
    InvalidUtf8 { bucket: String, key: String },
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("receipt handle references key {key:?} but no bucket is known")]
    MissingBucket { key: String },

    /// The queue delete failed; the object was left untouched.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// The queue delete succeeded but the object could not be removed.
    #[error("failed to delete message body at ({bucket}){key}: {source}")]
    Object {
        bucket: String,
        key: String,
        #[source]
        source: ObjectStoreError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FinalizeError {
    #[error(transparent)]
    Malformed(#[from] CodecError),

    #[error("failed to delete message body at ({bucket}){key}: {source}")]
    Object {
        bucket: String,
        key: String,
        #[source]
        source: ObjectStoreError,
    },
}

/// Errors from loading a [`ClientConfig`](crate::config::ClientConfig) file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

pub type QueueResult<T> = std::result::Result<T, QueueError>;
pub type ObjectStoreResult<T> = std::result::Result<T, ObjectStoreError>;
