use futures::future::join_all;
use tracing::debug;

use super::ExtendedClient;
use crate::codec::{reference_in, wrap_receipt_handle, RESERVED_ATTRIBUTE_NAME};
use crate::error::{ReceiveError, ResolveError};
use crate::message::{Message, ReceiveMessageRequest};

/// Messages returned by [`ExtendedClient::receive_message`], one outcome per
/// delivered message in queue order.
#[derive(Debug)]
pub struct ReceiveBatch {
    pub messages: Vec<Result<Message, ResolveError>>,
}

impl ReceiveBatch {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Collapse the batch into a single result, failing with the first
    /// per-message error in queue order.
    pub fn into_messages(self) -> Result<Vec<Message>, ResolveError> {
        self.messages.into_iter().collect()
    }
}

impl ExtendedClient {
    /// Receive messages and restore offloaded bodies.
    ///
    /// The reserved attribute is always requested. Offloaded bodies are
    /// fetched concurrently; a failed fetch is reported for that message
    /// only, after every sibling fetch has finished. Offloaded messages get a
    /// wrapped receipt handle carrying the object location for deletion.
    #[tracing::instrument(skip_all, fields(queue_url = %request.queue_url))]
    pub async fn receive_message(
        &self,
        mut request: ReceiveMessageRequest,
    ) -> Result<ReceiveBatch, ReceiveError> {
        if !request.selects_attribute(RESERVED_ATTRIBUTE_NAME) {
            request
                .attribute_names
                .push(RESERVED_ATTRIBUTE_NAME.to_string());
        }

        let delivered = self.queue.receive_message(request).await?;
        debug!(count = delivered.len(), "received messages");

        let messages = join_all(delivered.into_iter().map(|m| self.resolve_message(m))).await;
        Ok(ReceiveBatch { messages })
    }

    async fn resolve_message(&self, mut message: Message) -> Result<Message, ResolveError> {
        let Some(reference) = reference_in(&message.attributes)? else {
            message.body = self.transform.recombine(&message, None);
            return Ok(message);
        };

        let content = self.fetch_body(&reference).await?;
        message.body = self.transform.recombine(&message, Some(content));
        message.receipt_handle =
            wrap_receipt_handle(&reference.bucket, &reference.key, &message.receipt_handle);
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::codec::{unwrap_receipt_handle, BUCKET_MARKER, KEY_MARKER};
    use crate::error::{CodecError, ObjectStoreError};
    use crate::message::{Attributes, MessageAttribute};
    use crate::queue::MemoryQueue;
    use crate::store::MemoryObjectStore;

    fn setup() -> (ExtendedClient, Arc<MemoryQueue>, Arc<MemoryObjectStore>) {
        let queue = Arc::new(MemoryQueue::new("q"));
        let store = Arc::new(MemoryObjectStore::new());
        let client = ExtendedClient::builder(queue.clone(), store.clone())
            .bucket_name("test-bucket")
            .build();
        (client, queue, store)
    }

    fn message(id: &str, body: &str, reference: Option<&str>) -> Message {
        let mut attributes = Attributes::new();
        if let Some(reference) = reference {
            attributes.insert(
                RESERVED_ATTRIBUTE_NAME.to_string(),
                MessageAttribute::string(reference),
            );
        }
        Message {
            message_id: id.to_string(),
            receipt_handle: format!("handle-{id}"),
            body: body.to_string(),
            attributes,
        }
    }

    #[tokio::test]
    async fn reserved_attribute_is_always_requested() {
        let (client, queue, _store) = setup();
        client
            .receive_message(ReceiveMessageRequest::new("q").with_attribute_name("tenant"))
            .await
            .unwrap();

        let requests = queue.receive_requests().await;
        assert_eq!(
            requests[0].attribute_names,
            vec!["tenant".to_string(), RESERVED_ATTRIBUTE_NAME.to_string()]
        );
    }

    #[tokio::test]
    async fn wildcard_request_is_left_alone() {
        let (client, queue, _store) = setup();
        client
            .receive_message(ReceiveMessageRequest::new("q").with_attribute_name("All"))
            .await
            .unwrap();
        assert_eq!(queue.receive_requests().await[0].attribute_names, vec!["All".to_string()]);
    }

    #[tokio::test]
    async fn offloaded_body_is_restored_and_handle_wrapped() {
        let (client, queue, store) = setup();
        store.insert("test-bucket", "8765-4321", "message body").await;
        queue
            .push_message(message("1", "8765-4321", Some("(test-bucket)8765-4321")))
            .await;

        let batch = client
            .receive_message(ReceiveMessageRequest::new("q"))
            .await
            .unwrap();
        let received = batch.into_messages().unwrap();

        assert_eq!(received[0].body, "message body");
        assert_eq!(
            received[0].receipt_handle,
            format!("{BUCKET_MARKER}test-bucket{BUCKET_MARKER}{KEY_MARKER}8765-4321{KEY_MARKER}handle-1")
        );
        assert_eq!(unwrap_receipt_handle(&received[0].receipt_handle).receipt_handle, "handle-1");
        assert!(received[0].attributes.contains_key(RESERVED_ATTRIBUTE_NAME));
    }

    #[tokio::test]
    async fn plain_message_passes_through() {
        let (client, queue, store) = setup();
        queue.push_message(message("1", "inline", None)).await;

        let received = client
            .receive_message(ReceiveMessageRequest::new("q"))
            .await
            .unwrap()
            .into_messages()
            .unwrap();
        assert_eq!(received[0].body, "inline");
        assert_eq!(received[0].receipt_handle, "handle-1");
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_isolated_to_its_message() {
        let (client, queue, store) = setup();
        store.insert("test-bucket", "present", "restored").await;
        queue
            .push_message(message("1", "missing", Some("(test-bucket)missing")))
            .await;
        queue
            .push_message(message("2", "present", Some("(test-bucket)present")))
            .await;
        queue.push_message(message("3", "inline", None)).await;

        let batch = client
            .receive_message(ReceiveMessageRequest::new("q").with_max_messages(10))
            .await
            .unwrap();
        assert_eq!(batch.len(), 3);

        match &batch.messages[0] {
            Err(ResolveError::Fetch { key, source, .. }) => {
                assert_eq!(key, "missing");
                assert!(matches!(source, ObjectStoreError::NotFound { .. }));
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
        assert_eq!(batch.messages[1].as_ref().unwrap().body, "restored");
        assert_eq!(batch.messages[2].as_ref().unwrap().body, "inline");

        let err = batch.into_messages().unwrap_err();
        assert!(matches!(err, ResolveError::Fetch { .. }));
    }

    #[tokio::test]
    async fn malformed_reference_is_surfaced() {
        let (client, queue, _store) = setup();
        queue
            .push_message(message("1", "body", Some("not-a-reference")))
            .await;

        let batch = client
            .receive_message(ReceiveMessageRequest::new("q"))
            .await
            .unwrap();
        assert!(matches!(
            &batch.messages[0],
            Err(ResolveError::Malformed(CodecError::MalformedReference(token))) if token == "not-a-reference"
        ));
    }

    #[tokio::test]
    async fn binary_reserved_attribute_is_malformed() {
        let (client, queue, store) = setup();
        let mut placeholder = message("1", "k", None);
        placeholder.attributes.insert(
            RESERVED_ATTRIBUTE_NAME.to_string(),
            MessageAttribute::binary(b"(test-bucket)k".to_vec()),
        );
        queue.push_message(placeholder).await;

        let batch = client
            .receive_message(ReceiveMessageRequest::new("q"))
            .await
            .unwrap();
        assert!(
            matches!(
                &batch.messages[0],
                Err(ResolveError::Malformed(CodecError::MalformedReference(_)))
            ),
            "got {:?}",
            batch.messages[0]
        );
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn non_utf8_object_is_an_error() {
        let (client, queue, store) = setup();
        store.insert("test-bucket", "bin", vec![0xff, 0xfe]).await;
        queue
            .push_message(message("1", "bin", Some("(test-bucket)bin")))
            .await;

        let batch = client
            .receive_message(ReceiveMessageRequest::new("q"))
            .await
            .unwrap();
        assert!(matches!(&batch.messages[0], Err(ResolveError::InvalidUtf8 { .. })));
    }

    #[tokio::test]
    async fn empty_queue_returns_empty_batch() {
        let (client, _queue, _store) = setup();
        let batch = client
            .receive_message(ReceiveMessageRequest::new("q"))
            .await
            .unwrap();
        assert!(batch.is_empty());
    }
}
