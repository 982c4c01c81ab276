use async_trait::async_trait;

use crate::error::QueueResult;
use crate::message::{
    DeleteMessageRequest, Message, ReceiveMessageRequest, SendMessageOutput, SendMessageRequest,
};

/// Queue transport primitives. Implementations must be thread-safe.
///
/// Retries, batching and visibility timeouts belong to the implementation;
/// callers see each call succeed or fail once.
#[async_trait]
pub trait Queue: Send + Sync {
    /// Put one message on the queue.
    async fn send_message(&self, request: SendMessageRequest) -> QueueResult<SendMessageOutput>;

    /// Receive up to `max_number_of_messages` messages, returning only the
    /// attributes selected by `attribute_names`.
    async fn receive_message(&self, request: ReceiveMessageRequest) -> QueueResult<Vec<Message>>;

    /// Acknowledge a delivery by its receipt handle.
    async fn delete_message(&self, request: DeleteMessageRequest) -> QueueResult<()>;
}
