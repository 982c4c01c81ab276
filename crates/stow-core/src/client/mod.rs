mod delete;
mod event;
mod receive;
mod send;

use std::sync::Arc;

use tracing::debug;

use crate::codec::ObjectRef;
use crate::config::OffloadConfig;
use crate::error::ResolveError;
use crate::queue::Queue;
use crate::store::ObjectStore;
use crate::transform::{SizeThreshold, Transform};

pub use event::{EventAttribute, EventRecord, SqsEvent};
pub use receive::ReceiveBatch;

/// Queue client that moves oversized bodies to an object store and back.
///
/// Sends, receives and deletes go through the wrapped [`Queue`]; bodies
/// chosen by the [`Transform`] are stored in the [`ObjectStore`] and replaced
/// by a reference. The client is `Clone`, `Send`, and `Sync` and its
/// configuration is fixed once built.
#[derive(Clone)]
pub struct ExtendedClient {
    queue: Arc<dyn Queue>,
    store: Arc<dyn ObjectStore>,
    bucket_name: Option<String>,
    transform: Arc<dyn Transform>,
}

impl std::fmt::Debug for ExtendedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedClient")
            .field("bucket_name", &self.bucket_name)
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}

impl ExtendedClient {
    pub fn builder(queue: Arc<dyn Queue>, store: Arc<dyn ObjectStore>) -> ExtendedClientBuilder {
        ExtendedClientBuilder {
            queue,
            store,
            bucket_name: None,
            threshold: SizeThreshold::default(),
            transform: None,
        }
    }

    /// Build a client from an `[offload]` config section with the default
    /// size-threshold transform.
    pub fn from_config(
        queue: Arc<dyn Queue>,
        store: Arc<dyn ObjectStore>,
        config: &OffloadConfig,
    ) -> Self {
        Self::builder(queue, store).config(config).build()
    }

    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket_name.as_deref()
    }

    /// Fetch an offloaded body and decode it as UTF-8.
    async fn fetch_body(&self, reference: &ObjectRef) -> Result<String, ResolveError> {
        let bytes = self
            .store
            .get_object(&reference.bucket, &reference.key)
            .await
            .map_err(|source| ResolveError::Fetch {
                bucket: reference.bucket.clone(),
                key: reference.key.clone(),
                source,
            })?;
        debug!(bucket = %reference.bucket, key = %reference.key, bytes = bytes.len(), "fetched offloaded body");

        String::from_utf8(bytes).map_err(|_| ResolveError::InvalidUtf8 {
            bucket: reference.bucket.clone(),
            key: reference.key.clone(),
        })
    }
}

/// Builder for [`ExtendedClient`].
pub struct ExtendedClientBuilder {
    queue: Arc<dyn Queue>,
    store: Arc<dyn ObjectStore>,
    bucket_name: Option<String>,
    threshold: SizeThreshold,
    transform: Option<Arc<dyn Transform>>,
}

impl ExtendedClientBuilder {
    pub fn bucket_name(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket_name.into());
        self
    }

    pub fn always_use_object_store(mut self, always: bool) -> Self {
        self.threshold.always_offload = always;
        self
    }

    pub fn size_threshold_bytes(mut self, threshold_bytes: usize) -> Self {
        self.threshold.threshold_bytes = threshold_bytes;
        self
    }

    /// Apply every setting from an `[offload]` config section.
    pub fn config(mut self, config: &OffloadConfig) -> Self {
        self.bucket_name = config.bucket_name.clone();
        self.threshold = SizeThreshold {
            always_offload: config.always_use_object_store,
            threshold_bytes: config.size_threshold_bytes,
        };
        self
    }

    /// Install custom split/recombine hooks. Size threshold and
    /// always-offload settings are ignored once a transform is set.
    pub fn transform(mut self, transform: Arc<dyn Transform>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn build(self) -> ExtendedClient {
        let transform = self
            .transform
            .unwrap_or_else(|| Arc::new(self.threshold) as Arc<dyn Transform>);
        ExtendedClient {
            queue: self.queue,
            store: self.store,
            bucket_name: self.bucket_name,
            transform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::MemoryQueue;
    use crate::store::MemoryObjectStore;

    #[test]
    fn config_populates_builder() {
        let config = OffloadConfig {
            bucket_name: Some("bucket".to_string()),
            always_use_object_store: true,
            size_threshold_bytes: 10,
        };
        let client = ExtendedClient::from_config(
            Arc::new(MemoryQueue::new("q")),
            Arc::new(MemoryObjectStore::new()),
            &config,
        );
        assert_eq!(client.bucket_name(), Some("bucket"));
        let debug = format!("{client:?}");
        assert!(debug.contains("always_offload: true"), "{debug}");
        assert!(debug.contains("threshold_bytes: 10"), "{debug}");
    }

    #[test]
    fn builder_defaults_to_size_threshold() {
        let client = ExtendedClient::builder(
            Arc::new(MemoryQueue::new("q")),
            Arc::new(MemoryObjectStore::new()),
        )
        .build();
        assert_eq!(client.bucket_name(), None);
        assert!(format!("{client:?}").contains("threshold_bytes: 262144"));
    }
}
