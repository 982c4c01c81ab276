use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{ObjectStoreError, ObjectStoreResult};
use crate::store::traits::ObjectStore;

/// One recorded call against a [`MemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Put { bucket: String, key: String },
    Get { bucket: String, key: String },
    Delete { bucket: String, key: String },
}

#[derive(Debug, Default)]
struct State {
    objects: HashMap<(String, String), Vec<u8>>,
    calls: Vec<StoreCall>,
}

/// In-process object store for tests and local runs. Any bucket name is
/// accepted.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    state: Mutex<State>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without recording a call.
    pub async fn insert(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.state
            .lock()
            .await
            .objects
            .insert((bucket.to_string(), key.to_string()), body.into());
    }

    pub async fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .await
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.objects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Every call made against the store, in order.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> ObjectStoreResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        state
            .objects
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<Vec<u8>> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> ObjectStoreResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        state.objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryObjectStore::new();
        store.put_object("b", "k", b"data".to_vec()).await.unwrap();
        assert_eq!(store.get_object("b", "k").await.unwrap(), b"data");

        store.delete_object("b", "k").await.unwrap();
        assert!(store.is_empty().await);
        assert_eq!(
            store.calls().await,
            vec![
                StoreCall::Put { bucket: "b".into(), key: "k".into() },
                StoreCall::Get { bucket: "b".into(), key: "k".into() },
                StoreCall::Delete { bucket: "b".into(), key: "k".into() },
            ]
        );
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let store = MemoryObjectStore::new();
        let err = store.get_object("b", "missing").await.unwrap_err();
        assert_eq!(
            err,
            ObjectStoreError::NotFound {
                bucket: "b".to_string(),
                key: "missing".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn deleting_missing_object_succeeds() {
        let store = MemoryObjectStore::new();
        store.delete_object("b", "missing").await.unwrap();
    }

    #[tokio::test]
    async fn insert_does_not_record_a_call() {
        let store = MemoryObjectStore::new();
        store.insert("b", "k", "seeded").await;
        assert_eq!(store.object("b", "k").await.as_deref(), Some(&b"seeded"[..]));
        assert!(store.calls().await.is_empty());
    }
}
